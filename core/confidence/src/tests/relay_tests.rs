use std::sync::Arc;

use common::adapter::{NoopLog, StdFileSystem};
use common::domain::AgentId;
use common::error::Error;
use common::ports::outbound::LogLevel;
use serde_json::{json, Value};

use super::fakes::{MemoryLog, RecordingMessenger, StepClock};
use crate::domain::RelayOutcome;
use crate::usecase::{label_from_result, RelayUseCase};

/// 2026-02-07T12:00:00.000Z
const T0: u64 = 1_770_465_600_000;

fn use_case(messenger: Arc<RecordingMessenger>) -> RelayUseCase {
    RelayUseCase::new(
        messenger,
        AgentId::new("agent-123"),
        Arc::new(StepClock::new(T0, 5)),
        Arc::new(NoopLog),
    )
}

#[test]
fn test_relay_sends_title_case_and_returns_lower_case() {
    for (input, title, lower) in [
        ("high", "High", "high"),
        ("HIGH", "High", "high"),
        ("super low", "Super Low", "super low"),
        ("SUPER LOW", "Super Low", "super low"),
        ("Medium", "Medium", "medium"),
    ] {
        let messenger = Arc::new(RecordingMessenger::default());
        let outcome = use_case(messenger.clone()).relay(Some(input));
        assert_eq!(outcome, RelayOutcome::relayed(lower));
        assert_eq!(messenger.messages(), vec![format!("CONFIDENCE LEVEL: {}", title)]);
    }
}

#[test]
fn test_relay_targets_configured_agent() {
    let messenger = Arc::new(RecordingMessenger::default());
    use_case(messenger.clone()).relay(Some("low"));
    let sent = messenger.sent.lock().unwrap();
    assert_eq!(sent[0].0, "agent-123");
}

#[test]
fn test_relay_output_shape() {
    let outcome = use_case(Arc::new(RecordingMessenger::default())).relay(Some("Low"));
    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v, json!({"outputs": {"confidence_level": "low"}, "request_heartbeat": false}));
    assert!(!outcome.is_error());
}

#[test]
fn test_relay_does_not_validate_label() {
    let messenger = Arc::new(RecordingMessenger::default());
    let outcome = use_case(messenger.clone()).relay(Some("very HIGH"));
    assert_eq!(outcome, RelayOutcome::relayed("very high"));
    assert_eq!(messenger.messages(), vec!["CONFIDENCE LEVEL: Very High"]);
}

#[test]
fn test_relay_missing_label_makes_no_call() {
    let messenger = Arc::new(RecordingMessenger::default());
    let uc = use_case(messenger.clone());
    for label in [None, Some(""), Some("   ")] {
        let outcome = uc.relay(label);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "No confidence level provided"})
        );
    }
    assert!(messenger.messages().is_empty());
}

#[test]
fn test_relay_failure_returns_error_envelope() {
    let messenger = Arc::new(RecordingMessenger::failing(Error::http("Agent API error: HTTP 401")));
    let outcome = use_case(messenger).relay(Some("medium"));
    assert!(outcome.is_error());

    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v["error"], "Error in confidence relay: Agent API error: HTTP 401");
    assert_eq!(v["message_type"], "system_message");
    let content: Value = serde_json::from_str(v["content"].as_str().unwrap()).unwrap();
    assert_eq!(content["type"], "system_alert");
    assert_eq!(content["message"], "Error");
    // 開始・送信前・送信後で 3 回読む
    assert_eq!(content["time"], "2026-02-07T12:00:00.010Z");
}

#[test]
fn test_relay_failure_time_format() {
    let messenger = Arc::new(RecordingMessenger::failing(Error::http("timeout")));
    let uc = RelayUseCase::new(
        messenger,
        AgentId::new("a"),
        Arc::new(common::adapter::StdClock),
        Arc::new(NoopLog),
    );
    let v = serde_json::to_value(uc.relay(Some("high"))).unwrap();
    let content: Value = serde_json::from_str(v["content"].as_str().unwrap()).unwrap();
    let time = content["time"].as_str().unwrap();
    // YYYY-MM-DDTHH:MM:SS.mmmZ
    assert_eq!(time.len(), 24);
    assert!(time.ends_with('Z'));
    assert_eq!(&time[4..5], "-");
    assert_eq!(&time[10..11], "T");
    assert_eq!(&time[19..20], ".");
    assert!(time[20..23].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_relay_logs_timing() {
    let log = Arc::new(MemoryLog::default());
    let uc = RelayUseCase::new(
        Arc::new(RecordingMessenger::default()),
        AgentId::new("agent-123"),
        Arc::new(StepClock::new(T0, 7)),
        log.clone(),
    );
    uc.relay(Some("high"));

    let records = log.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, LogLevel::Info);
    let fields = records[0].fields.as_ref().unwrap();
    assert_eq!(fields["api_call_ms"], json!(7));
    assert_eq!(fields["total_ms"], json!(14));
    assert_eq!(fields["confidence_level"], json!("high"));
}

#[test]
fn test_label_from_result_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("result.json");
    std::fs::write(&path, r#"{"stage_origin": "Identify", "confidence_level": "Super Low"}"#).unwrap();
    assert_eq!(
        label_from_result(&StdFileSystem, &path).unwrap().as_deref(),
        Some("Super Low")
    );

    std::fs::write(&path, r#"{"stage_origin": "Identify"}"#).unwrap();
    assert_eq!(label_from_result(&StdFileSystem, &path).unwrap(), None);
}

#[test]
fn test_label_from_result_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = label_from_result(&StdFileSystem, &tmp.path().join("missing.json")).unwrap_err();
    assert_eq!(missing.exit_code(), 74);

    let bad = tmp.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();
    let e = label_from_result(&StdFileSystem, &bad).unwrap_err();
    assert!(matches!(e, Error::Json(_)));
}

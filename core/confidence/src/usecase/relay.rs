//! 確信度ラベルを会話エージェントへ中継する
//!
//! 返信は読まない。外部呼び出しの失敗はエラー封筒にして返す。

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use common::domain::{title_case, AgentId};
use common::error::Error;
use common::ports::outbound::{iso8601_millis, now_iso8601, AgentMessenger, Clock, FileSystem, Log, LogLevel, LogRecord};
use serde_json::{json, Value};

use crate::domain::outcome::MESSAGE_PREFIX;
use crate::domain::{non_blank_label, RelayOutcome};

/// 中継ユースケース
pub struct RelayUseCase {
    messenger: Arc<dyn AgentMessenger>,
    agent_id: AgentId,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
}

impl RelayUseCase {
    pub fn new(
        messenger: Arc<dyn AgentMessenger>,
        agent_id: AgentId,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            messenger,
            agent_id,
            clock,
            log,
        }
    }

    fn log(&self, level: LogLevel, kind: &str, message: String, fields: BTreeMap<String, Value>) {
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message,
            layer: Some("usecase".to_string()),
            kind: Some(kind.to_string()),
            fields: Some(fields),
        });
    }

    /// ラベルをタイトルケースにして送信し、小文字のラベルを返す
    ///
    /// 4 値のどれかであるかは検査しない。
    pub fn relay(&self, label: Option<&str>) -> RelayOutcome {
        let start = self.clock.now_ms();
        let Some(label) = non_blank_label(label) else {
            return RelayOutcome::rejected();
        };
        let message = format!("{}{}", MESSAGE_PREFIX, title_case(label));

        let mut fields = BTreeMap::new();
        fields.insert("agent_id".to_string(), json!(self.agent_id.to_string()));
        fields.insert("confidence_level".to_string(), json!(label.to_lowercase()));

        let api_start = self.clock.now_ms();
        let sent = self.messenger.send_user_message(&self.agent_id, &message);
        let end = self.clock.now_ms();
        fields.insert("api_call_ms".to_string(), json!(end.saturating_sub(api_start)));
        fields.insert("total_ms".to_string(), json!(end.saturating_sub(start)));

        match sent {
            Ok(()) => {
                self.log(LogLevel::Info, "perf", "confidence relayed".to_string(), fields);
                RelayOutcome::relayed(label)
            }
            Err(e) => {
                self.log(LogLevel::Error, "agent", format!("confidence relay failed: {}", e), fields);
                RelayOutcome::failed(e, &iso8601_millis(end))
            }
        }
    }
}

/// result.json の confidence_level を文字列のまま取り出す（無ければ None）
pub fn label_from_result(fs: &dyn FileSystem, path: &Path) -> Result<Option<String>, Error> {
    let contents = fs.read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| Error::json(format!("Failed to parse '{}': {}", path.display(), e)))?;
    Ok(value
        .get("confidence_level")
        .and_then(Value::as_str)
        .map(str::to_string))
}

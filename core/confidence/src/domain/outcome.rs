//! 中継結果（ツールの戻り値としてそのまま JSON にする）
//!
//! 成功・入力不備・外部失敗の 3 形。いずれも Err ではなくデータとして返す。

use serde::Serialize;

/// ラベルが無い・空白のみのときのエラー文
pub const NO_LABEL_ERROR: &str = "No confidence level provided";
/// エージェントへ送る本文の接頭辞
pub const MESSAGE_PREFIX: &str = "CONFIDENCE LEVEL: ";
const FAILURE_PREFIX: &str = "Error in confidence relay: ";
const SYSTEM_MESSAGE: &str = "system_message";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayOutputs {
    pub confidence_level: String,
}

/// エラー封筒の content に入れるアラート（キー順は type, message, time）
#[derive(Serialize)]
struct SystemAlert<'a> {
    #[serde(rename = "type")]
    type_: &'a str,
    message: &'a str,
    time: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelayOutcome {
    Relayed {
        outputs: RelayOutputs,
        request_heartbeat: bool,
    },
    Rejected {
        error: String,
    },
    Failed {
        error: String,
        message_type: String,
        /// JSON 文字列（二重エンコード）
        content: String,
    },
}

impl RelayOutcome {
    /// 送信済み。ラベルは小文字にして返す
    pub fn relayed(label: &str) -> Self {
        Self::Relayed {
            outputs: RelayOutputs {
                confidence_level: label.to_lowercase(),
            },
            request_heartbeat: false,
        }
    }

    pub fn rejected() -> Self {
        Self::Rejected {
            error: NO_LABEL_ERROR.to_string(),
        }
    }

    /// `time` は UTC の yyyy-mm-ddThh:mm:ss.mmmZ
    pub fn failed(cause: impl std::fmt::Display, time: &str) -> Self {
        let alert = SystemAlert {
            type_: "system_alert",
            message: "Error",
            time,
        };
        Self::Failed {
            error: format!("{}{}", FAILURE_PREFIX, cause),
            message_type: SYSTEM_MESSAGE.to_string(),
            content: serde_json::to_string(&alert).unwrap_or_default(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Relayed { .. })
    }
}

/// 空・空白のみのラベルを None にする（中身はそのまま返す）
pub fn non_blank_label(label: Option<&str>) -> Option<&str> {
    label.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relayed_shape() {
        let v = serde_json::to_value(RelayOutcome::relayed("Super Low")).unwrap();
        assert_eq!(
            v,
            json!({"outputs": {"confidence_level": "super low"}, "request_heartbeat": false})
        );
    }

    #[test]
    fn test_rejected_shape() {
        let v = serde_json::to_value(RelayOutcome::rejected()).unwrap();
        assert_eq!(v, json!({"error": "No confidence level provided"}));
        assert!(RelayOutcome::rejected().is_error());
    }

    #[test]
    fn test_failed_shape() {
        let outcome = RelayOutcome::failed("HTTP 401", "2026-02-07T12:00:00.123Z");
        assert!(outcome.is_error());
        let v = serde_json::to_value(&outcome).unwrap();
        assert_eq!(v["error"], "Error in confidence relay: HTTP 401");
        assert_eq!(v["message_type"], "system_message");
        assert_eq!(
            v["content"],
            r#"{"type":"system_alert","message":"Error","time":"2026-02-07T12:00:00.123Z"}"#
        );
    }

    #[test]
    fn test_non_blank_label() {
        assert_eq!(non_blank_label(None), None);
        assert_eq!(non_blank_label(Some("")), None);
        assert_eq!(non_blank_label(Some("  \t")), None);
        assert_eq!(non_blank_label(Some("high")), Some("high"));
    }
}

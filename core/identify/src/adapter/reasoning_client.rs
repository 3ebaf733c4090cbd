//! 推論クライアント（構造化出力の Chat Completions を 1 回呼ぶ Reasoner 実装）
//!
//! 送信失敗・非 2xx・応答の解析失敗はすべて同じ定型レコードにして返す。
//! リトライはしない（2 回目の推論は呼び出し側が前回結果を付けて行う）。

use std::collections::BTreeMap;
use std::sync::Arc;

use common::domain::{PatientContext, ResultRecord};
use common::error::Error;
use common::llm::{LlmProvider, ResponseFormat};
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use serde_json::json;

use crate::domain::prompt::{build_system_instruction, RESPONSE_SCHEMA_NAME};
use crate::ports::outbound::Reasoner;

/// 推論クライアント
pub struct ReasoningClient {
    provider: Arc<dyn LlmProvider>,
    log: Arc<dyn Log>,
}

impl ReasoningClient {
    pub fn new(provider: Arc<dyn LlmProvider>, log: Arc<dyn Log>) -> Self {
        Self { provider, log }
    }

    fn fallback(&self, reason: &str, detail: String) -> ResultRecord {
        let mut fields = BTreeMap::new();
        fields.insert("provider".to_string(), json!(self.provider.name()));
        fields.insert("reason".to_string(), json!(reason));
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Warn,
            message: format!("returning fallback record: {}", detail),
            layer: Some("adapter".to_string()),
            kind: Some("fallback".to_string()),
            fields: Some(fields),
        });
        ResultRecord::fallback()
    }
}

impl Reasoner for ReasoningClient {
    fn evaluate(
        &self,
        context: &PatientContext,
        prior: Option<&ResultRecord>,
    ) -> Result<ResultRecord, Error> {
        let query = context
            .to_canonical_text()
            .map_err(|e| Error::json(format!("Failed to serialize patient context: {}", e)))?;
        let system = build_system_instruction(prior)
            .map_err(|e| Error::json(format!("Failed to serialize prior result: {}", e)))?;
        let format = ResponseFormat::json_schema(RESPONSE_SCHEMA_NAME, ResultRecord::response_schema());

        let text = match self.provider.complete(&query, Some(&system), Some(&format)) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(self.fallback("empty", "response has no content".to_string())),
            Err(e) => return Ok(self.fallback("transport", e.to_string())),
        };

        match ResultRecord::parse(&text) {
            Ok(record) => {
                let mut fields = BTreeMap::new();
                fields.insert("confidence_level".to_string(), json!(record.confidence_level));
                let _ = self.log.log(&LogRecord {
                    ts: now_iso8601(),
                    level: LogLevel::Info,
                    message: "result record parsed".to_string(),
                    layer: Some("adapter".to_string()),
                    kind: Some("llm".to_string()),
                    fields: Some(fields),
                });
                Ok(record)
            }
            Err(e) => Ok(self.fallback("unparseable", e.to_string())),
        }
    }
}

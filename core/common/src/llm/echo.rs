//! Echo プロバイダの実装
//!
//! 実際に LLM API を呼び出さず、固定テキストを返す。
//! 応答は JSON ではないため、推論クライアントでは常に定型レコードになる（オフライン確認用）。

use crate::error::Error;
use crate::llm::provider::{LlmProvider, ResponseFormat};
use serde_json::{json, Value};

pub const ECHO_TEXT: &str = "[Echo Provider] Query received (no actual LLM call made)";

/// Echo プロバイダ
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Value, Error> {
        let mut payload = json!({
            "query": query,
        });
        if let Some(system) = system_instruction {
            payload["system_instruction"] = json!(system);
        }
        if let Some(format) = response_format {
            payload["response_format"] = format.to_payload();
        }
        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        Ok(json!({ "echo": request_json }).to_string())
    }

    fn parse_response_text(&self, _response_json: &str) -> Result<Option<String>, Error> {
        Ok(Some(ECHO_TEXT.to_string()))
    }
}

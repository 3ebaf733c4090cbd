//! Letta エージェント API クライアント（POST /v1/agents/{agent_id}/messages）

use crate::domain::AgentId;
use crate::error::Error;
use crate::ports::outbound::AgentMessenger;
use serde_json::{json, Value};

/// Letta のエージェントへメッセージを送る AgentMessenger 実装
///
/// HTTP クライアントは生成時に 1 つだけ作る。
pub struct LettaAgentClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl LettaAgentClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, Error> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self, agent_id: &AgentId) -> String {
        format!("{}/v1/agents/{}/messages", self.base_url, agent_id)
    }

    /// user ロールのテキスト 1 件を送るリクエスト本文
    pub fn message_payload(text: &str) -> Value {
        json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": text }
                    ]
                }
            ]
        })
    }
}

impl AgentMessenger for LettaAgentClient {
    fn send_user_message(&self, agent_id: &AgentId, text: &str) -> Result<(), Error> {
        let mut builder = self
            .client
            .post(self.url(agent_id))
            .header("Content-Type", "application/json")
            .body(Self::message_payload(text).to_string());

        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::http(format!("Agent API error: HTTP {}: {}", status, body)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let c = LettaAgentClient::new("https://api.letta.com/", None).unwrap();
        assert_eq!(
            c.url(&AgentId::new("agent-1")),
            "https://api.letta.com/v1/agents/agent-1/messages"
        );
    }

    #[test]
    fn test_message_payload_shape() {
        let v = LettaAgentClient::message_payload("CONFIDENCE LEVEL: High");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"][0]["type"], "text");
        assert_eq!(v["messages"][0]["content"][0]["text"], "CONFIDENCE LEVEL: High");
    }

    #[test]
    fn test_unreachable_endpoint_is_http_error() {
        let c = LettaAgentClient::new("http://127.0.0.1:9", Some("k".to_string())).unwrap();
        let e = c.send_user_message(&AgentId::new("agent-1"), "hi").unwrap_err();
        assert!(matches!(e, Error::Http(_)));
    }
}

//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイントを指定可能（Perplexity・OpenAI・ローカルサーバ）。
//! 構造化出力は `response_format`（json_schema）で指定する。

use crate::error::Error;
use crate::llm::provider::{LlmProvider, ResponseFormat};
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// OpenAI Chat Completions 互換プロバイダ
///
/// HTTP クライアントは生成時に 1 つだけ作り、以降の呼び出しで使い回す。
pub struct OpenAiCompatProvider {
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f64,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `model` - モデル名（None のとき DEFAULT_MODEL）
    /// * `base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `api_key` - API キー（None のとき Authorization を付けない）
    /// * `temperature` - 温度（None のとき DEFAULT_TEMPERATURE）
    pub fn new(
        model: Option<String>,
        base_url: Option<String>,
        api_key: Option<String>,
        temperature: Option<f32>,
    ) -> Result<Self, Error> {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let temperature = temperature.map(f64::from).unwrap_or(DEFAULT_TEMPERATURE);
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            model,
            base_url,
            api_key,
            temperature,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| format!("Bearer {}", key))
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Value, Error> {
        let mut messages: Vec<Value> = Vec::new();

        if let Some(s) = system_instruction {
            messages.push(json!({ "role": "system", "content": s }));
        }
        messages.push(json!({ "role": "user", "content": query }));

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": false
        });

        if let Some(format) = response_format {
            payload["response_format"] = format.to_payload();
        }

        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(request_json.to_string());

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error_msg = if let Ok(v) = serde_json::from_str::<Value>(&response_text) {
                v["error"]["message"]
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text))
            } else {
                format!("HTTP {}: {}", status, response_text)
            };
            return Err(Error::http(format!("Chat completions error: {}", error_msg)));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::http(format!("API error: {}", msg)));
        }

        let text = v["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_compat_make_request_payload_simple() {
        let p = OpenAiCompatProvider::new(
            Some("sonar-pro".to_string()),
            Some("https://api.example.com/".to_string()),
            None,
            Some(0.5),
        )
        .unwrap();
        let payload = p.make_request_payload("Hello", None, None).unwrap();
        assert_eq!(payload["model"], "sonar-pro");
        assert_eq!(payload["temperature"], 0.5);
        assert_eq!(payload["stream"], false);
        assert!(payload.get("response_format").is_none());
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Hello");
        assert_eq!(p.url(), "https://api.example.com/chat/completions");
    }

    #[test]
    fn test_openai_compat_make_request_payload_with_system_and_schema() {
        let p = OpenAiCompatProvider::new(None, None, None, None).unwrap();
        let format = ResponseFormat::json_schema("result_record", json!({"type": "object"}));
        let payload = p
            .make_request_payload("{\"question\":\"q\"}", Some("You are a medical AI assistant."), Some(&format))
            .unwrap();
        assert_eq!(payload["model"], DEFAULT_MODEL);
        let messages = payload["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(payload["response_format"]["type"], "json_schema");
        assert_eq!(payload["response_format"]["json_schema"]["name"], "result_record");
    }

    #[test]
    fn test_openai_compat_auth_header() {
        let p = OpenAiCompatProvider::new(None, None, Some("k".to_string()), None).unwrap();
        assert_eq!(p.auth_header().as_deref(), Some("Bearer k"));
        let p = OpenAiCompatProvider::new(None, None, None, None).unwrap();
        assert!(p.auth_header().is_none());
    }

    #[test]
    fn test_openai_compat_parse_response_text() {
        let p = OpenAiCompatProvider::new(None, None, None, None).unwrap();
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"{\"confidence_level\":\"high\"}"}}]}"#;
        let text = p.parse_response_text(json).unwrap();
        assert_eq!(text.as_deref(), Some("{\"confidence_level\":\"high\"}"));
    }

    #[test]
    fn test_openai_compat_parse_response_text_empty_content() {
        let p = OpenAiCompatProvider::new(None, None, None, None).unwrap();
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(p.parse_response_text(json).unwrap().is_none());
    }

    #[test]
    fn test_openai_compat_parse_response_errors() {
        let p = OpenAiCompatProvider::new(None, None, None, None).unwrap();
        let e = p.parse_response_text("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(e, Error::Json(_)));
        let e = p
            .parse_response_text(r#"{"error":{"message":"invalid api key"}}"#)
            .unwrap_err();
        assert!(e.to_string().contains("invalid api key"));
    }

    #[test]
    fn test_openai_compat_unreachable_endpoint_is_http_error() {
        let p = OpenAiCompatProvider::new(
            None,
            Some("http://127.0.0.1:9".to_string()),
            None,
            None,
        )
        .unwrap();
        let e = p.make_http_request("{}").unwrap_err();
        assert!(matches!(e, Error::Http(_)));
    }
}

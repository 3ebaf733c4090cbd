//! LLM プロバイダのトレイト定義

use crate::error::Error;
use serde_json::{json, Value};

/// 応答の形式指定（構造化出力）
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// JSON スキーマに沿った JSON オブジェクトを要求する
    JsonSchema { name: String, schema: Value },
}

impl ResponseFormat {
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self::JsonSchema {
            name: name.into(),
            schema,
        }
    }

    /// Chat Completions の `response_format` フィールド値
    pub fn to_payload(&self) -> Value {
        match self {
            Self::JsonSchema { name, schema } => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "schema": schema
                }
            }),
        }
    }
}

/// LLM プロバイダのトレイト
///
/// 各プロバイダ（openai_compat、echo など）はこのトレイトを実装する。
/// 1 回の呼び出しにつき 1 リクエスト。リトライは呼び出し側の方針とする。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `query` - ユーザーメッセージ
    /// * `system_instruction` - システム指示（オプション）
    /// * `response_format` - 構造化出力の指定（オプション）
    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Value, Error>;

    /// HTTP リクエストを実行してレスポンス本文を取得（非 2xx は Err）
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスからテキストを抽出（存在しない場合は None）
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;

    /// ペイロード生成 → 送信 → テキスト抽出を 1 回で行う
    fn complete(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Option<String>, Error> {
        let payload = self.make_request_payload(query, system_instruction, response_format)?;
        let request_json = serde_json::to_string(&payload)?;
        let response_json = self.make_http_request(&request_json)?;
        self.parse_response_text(&response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_response_format_payload() {
        let f = ResponseFormat::json_schema("result_record", json!({"type": "object"}));
        let v = f.to_payload();
        assert_eq!(v["type"], "json_schema");
        assert_eq!(v["json_schema"]["name"], "result_record");
        assert_eq!(v["json_schema"]["schema"]["type"], "object");
    }

    struct RecordingProvider {
        sent: Mutex<Vec<String>>,
    }

    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn make_request_payload(
            &self,
            query: &str,
            system_instruction: Option<&str>,
            _response_format: Option<&ResponseFormat>,
        ) -> Result<Value, Error> {
            Ok(json!({ "q": query, "s": system_instruction }))
        }

        fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
            self.sent.lock().unwrap().push(request_json.to_string());
            Ok(r#"{"text": "ok"}"#.to_string())
        }

        fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
            let v: Value = serde_json::from_str(response_json)?;
            Ok(v["text"].as_str().map(|s| s.to_string()))
        }
    }

    #[test]
    fn test_complete_default_chains_steps() {
        let p = RecordingProvider {
            sent: Mutex::new(Vec::new()),
        };
        let text = p.complete("hello", Some("sys"), None).unwrap();
        assert_eq!(text.as_deref(), Some("ok"));
        let sent = p.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("\"q\":\"hello\""));
        assert!(sent[0].contains("\"s\":\"sys\""));
    }
}

//! 推論結果レコード
//!
//! 成功・失敗・解析不能のいずれでも全キーが揃った形で返す。
//! 失敗時の定型レコードはここにだけ定義する。

use super::confidence::ConfidenceLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 推論レコードを生成したステージ名
pub const STAGE_IDENTIFY: &str = "Identify";

/// 外部呼び出しが失敗・解析不能だったときの仮説
pub const FALLBACK_HYPOTHESIS: [&str; 1] =
    ["The patient's symptoms may be related to hypertension and medication side effects."];
pub const FALLBACK_EVIDENCE: [&str; 3] = [
    "Patient has hypertension",
    "Takes lisinopril",
    "Experiences morning headaches and lightheadedness",
];
pub const FALLBACK_POTENTIAL_CAUSE: [&str; 5] = [
    "Medication side effects",
    "Blood pressure fluctuations",
    "Dehydration",
    "Poor sleep",
    "Stress",
];
pub const FALLBACK_REASONING_SUMMARY: &str =
    "Morning headaches combined with hypertension and lisinopril use suggest blood pressure regulation issues.";
pub const FALLBACK_CONFIDENCE: ConfidenceLevel = ConfidenceLevel::Medium;

/// 推論処理そのものが失敗したときのレコード内容
pub const FAILED_HYPOTHESIS: [&str; 1] = ["Analysis failed due to an error"];
pub const FAILED_EVIDENCE: [&str; 1] = ["Error occurred during processing"];
pub const FAILED_POTENTIAL_CAUSE: [&str; 2] = ["System error", "Data format issue"];
pub const FAILED_REASONING_SUMMARY: &str = "An error occurred while analyzing the patient data.";

/// 推論結果レコード
///
/// `potential_cause` は文字列リストを正規形とする（単一文字列の入力は 1 要素のリストとして受ける）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultRecord {
    #[serde(default)]
    pub current_hypothesis: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    #[schemars(with = "Vec<String>")]
    pub potential_cause: Vec<String>,
    #[serde(default)]
    pub reasoning_summary: String,
    #[serde(default)]
    pub stage_origin: String,
    pub confidence_level: ConfidenceLevel,
    /// medium のときに利用者へ尋ねる追加質問
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub error: Option<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ResultRecord {
    /// 外部呼び出しの失敗・応答の解析失敗で返す定型レコード
    pub fn fallback() -> Self {
        Self {
            current_hypothesis: to_strings(&FALLBACK_HYPOTHESIS),
            evidence: to_strings(&FALLBACK_EVIDENCE),
            potential_cause: to_strings(&FALLBACK_POTENTIAL_CAUSE),
            reasoning_summary: FALLBACK_REASONING_SUMMARY.to_string(),
            stage_origin: STAGE_IDENTIFY.to_string(),
            confidence_level: FALLBACK_CONFIDENCE,
            questions: None,
            error: None,
        }
    }

    /// 推論処理が Err で終わったときのレコード（error に理由を入れる）
    pub fn analysis_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            current_hypothesis: to_strings(&FAILED_HYPOTHESIS),
            evidence: to_strings(&FAILED_EVIDENCE),
            potential_cause: to_strings(&FAILED_POTENTIAL_CAUSE),
            reasoning_summary: FAILED_REASONING_SUMMARY.to_string(),
            stage_origin: STAGE_IDENTIFY.to_string(),
            confidence_level: ConfidenceLevel::SuperLow,
            questions: None,
            error: Some(format!("Error in identify: {}", reason)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// LLM の応答本文をレコードとして解析する
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(strip_code_fence(text))
    }

    /// 構造化出力に渡す JSON スキーマ
    ///
    /// `questions` 以外のプロパティはすべて required にする。
    pub fn response_schema() -> Value {
        let schema = schemars::schema_for!(ResultRecord);
        let mut value = serde_json::to_value(&schema).unwrap_or(Value::Null);
        let required: Vec<Value> = value["properties"]
            .as_object()
            .map(|props| {
                props
                    .keys()
                    .filter(|k| k.as_str() != "questions")
                    .map(|k| Value::String(k.clone()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("required".to_string(), Value::Array(required));
        }
        value
    }
}

/// ```json ... ``` で囲まれた応答から中身を取り出す
fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn string_or_seq<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_record_contents() {
        let r = ResultRecord::fallback();
        assert_eq!(r.stage_origin, "Identify");
        assert_eq!(r.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(r.current_hypothesis.len(), 1);
        assert_eq!(r.evidence[1], "Takes lisinopril");
        assert_eq!(
            r.potential_cause,
            vec!["Medication side effects", "Blood pressure fluctuations", "Dehydration", "Poor sleep", "Stress"]
        );
        assert!(r.questions.is_none());
        assert!(!r.is_error());
    }

    #[test]
    fn test_fallback_serialized_shape() {
        let v = serde_json::to_value(ResultRecord::fallback()).unwrap();
        let obj = v.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "confidence_level",
                "current_hypothesis",
                "evidence",
                "potential_cause",
                "reasoning_summary",
                "stage_origin"
            ]
        );
        assert_eq!(v["confidence_level"], "medium");
    }

    #[test]
    fn test_analysis_failed_record() {
        let r = ResultRecord::analysis_failed("boom");
        assert_eq!(r.confidence_level, ConfidenceLevel::SuperLow);
        assert_eq!(r.stage_origin, "Identify");
        assert_eq!(r.current_hypothesis, vec!["Analysis failed due to an error"]);
        assert_eq!(r.potential_cause, vec!["System error", "Data format issue"]);
        assert_eq!(r.error.as_deref(), Some("Error in identify: boom"));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["error"], "Error in identify: boom");
    }

    #[test]
    fn test_parse_well_formed_response() {
        let text = r#"{
            "current_hypothesis": ["Nocturnal hypertension"],
            "evidence": ["Morning headaches"],
            "potential_cause": ["Uncontrolled blood pressure"],
            "reasoning_summary": "BP peaks in the morning.",
            "stage_origin": "Identify",
            "confidence_level": "Medium",
            "questions": ["Do you snore?"]
        }"#;
        let r = ResultRecord::parse(text).unwrap();
        assert_eq!(r.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(r.questions, Some(vec!["Do you snore?".to_string()]));
        assert!(r.error.is_none());
    }

    #[test]
    fn test_parse_defaults_missing_fields() {
        let r = ResultRecord::parse(r#"{"confidence_level": "high"}"#).unwrap();
        assert!(r.current_hypothesis.is_empty());
        assert!(r.potential_cause.is_empty());
        assert_eq!(r.reasoning_summary, "");
        assert_eq!(r.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn test_parse_requires_confidence_level() {
        assert!(ResultRecord::parse(r#"{"current_hypothesis": []}"#).is_err());
        assert!(ResultRecord::parse(r#"{"confidence_level": "certain"}"#).is_err());
        assert!(ResultRecord::parse("I think it is hypertension.").is_err());
    }

    #[test]
    fn test_potential_cause_accepts_single_string_or_null() {
        let r = ResultRecord::parse(r#"{"potential_cause": "Stress", "confidence_level": "low"}"#).unwrap();
        assert_eq!(r.potential_cause, vec!["Stress"]);
        let r = ResultRecord::parse(r#"{"potential_cause": null, "confidence_level": "low"}"#).unwrap();
        assert!(r.potential_cause.is_empty());
    }

    #[test]
    fn test_parse_code_fenced_response() {
        let text = "```json\n{\"confidence_level\": \"super low\"}\n```";
        let r = ResultRecord::parse(text).unwrap();
        assert_eq!(r.confidence_level, ConfidenceLevel::SuperLow);
    }

    #[test]
    fn test_response_schema() {
        let schema = ResultRecord::response_schema();
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("confidence_level"));
        assert!(props.contains_key("questions"));
        assert!(!props.contains_key("error"));
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"potential_cause"));
        assert!(required.contains(&"confidence_level"));
        assert!(!required.contains(&"questions"));
        let text = schema.to_string();
        assert!(text.contains("super low"));
    }
}

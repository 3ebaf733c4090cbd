//! 患者コンテキスト（推論リクエストの入力）

use serde::{Deserialize, Serialize};

/// 基本情報（すべて任意の自由記述）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    /// "male" / "female" / "other" 等
    pub sex: Option<String>,
}

/// 病歴。各リストの順序に意味はなく、重複も許す
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistory {
    pub past_events: Vec<String>,
    pub current_illnesses: Vec<String>,
    pub symptoms: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub lifestyle_notes: Vec<String>,
}

/// 患者コンテキスト
///
/// リクエストごとに 1 回組み立て、以降は読み取りのみ。未知のキーは無視する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    #[serde(default)]
    pub basic_info: BasicInfo,
    /// 利用者の主訴・最初のメッセージ
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default)]
    pub medical_history: MedicalHistory,
}

impl PatientContext {
    /// 送信用の正規テキスト（コンパクト JSON）
    pub fn to_canonical_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

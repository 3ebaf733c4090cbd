//! 推論リクエストのシステム指示
//!
//! 指示文は確信度の 4 値を定義しているため、文言を変えずに送る。

use common::domain::ResultRecord;

/// 固定のシステム指示
pub const SYSTEM_INSTRUCTION: &str = "You are a medical AI assistant. Analyze the patient information and identify potential causes for their symptoms based on medical history and lifestyle factors. DO NOT touch user_given_info, there is no need to modify it. Focus on the relationship between hypertension, medication, and the reported symptoms. Consider possible explanations related to blood pressure, medication side effects, and lifestyle factors. For Confidence_level, there are only 4 options: super low, low, medium, high. Be conservative with the confidence level, but don't be too conservative. If you are not sure and would want more information from the user, choose medium and ask questions. If you are sure, choose high. If you are not sure at all, choose super low. If you are very sure, choose high.";

/// 2 回目の推論で前回結果の前に付ける文
pub const SECOND_ROUND_PREFIX: &str =
    "We already failed to find the cause, refer to the following information for more information: ";

/// 1 回目の推論で指示文の後ろに付ける文字列
pub const FIRST_ROUND_SUFFIX: &str = " ";

/// 構造化出力のスキーマ名
pub const RESPONSE_SCHEMA_NAME: &str = "result_record";

/// システム指示を組み立てる。前回結果があればコンパクト JSON で末尾に埋め込む
pub fn build_system_instruction(prior: Option<&ResultRecord>) -> Result<String, serde_json::Error> {
    let extra = match prior {
        Some(record) => format!("{}{}", SECOND_ROUND_PREFIX, serde_json::to_string(record)?),
        None => FIRST_ROUND_SUFFIX.to_string(),
    };
    Ok(format!("{}{}", SYSTEM_INSTRUCTION, extra))
}

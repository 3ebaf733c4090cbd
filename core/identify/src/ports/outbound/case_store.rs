//! 入力コンテキストと推論結果の読み書き Outbound ポート

use common::domain::{PatientContext, ResultRecord};
use common::error::Error;
use std::path::Path;

/// 出力ディレクトリに保存するファイル名
pub const CONTEXT_FILE: &str = "context.json";
pub const RESULT_FILE: &str = "result.json";

/// コンテキスト・結果の保存先
pub trait CaseStore: Send + Sync {
    /// JSON ファイルから患者コンテキストを読む
    fn load_context(&self, path: &Path) -> Result<PatientContext, Error>;
    /// JSON ファイルから推論レコードを読む（2 回目の推論用）
    fn load_result(&self, path: &Path) -> Result<ResultRecord, Error>;
    /// `dir` を作成し context.json と result.json を書く
    fn save(&self, dir: &Path, context: &PatientContext, result: &ResultRecord) -> Result<(), Error>;
}

//! identify コマンドの enum（Command Pattern）

use common::domain::{ModelName, ProviderName};
use std::path::PathBuf;

/// identify の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifyCommand {
    /// ヘルプ表示
    Help,
    /// プロファイル一覧表示
    ListProfiles,
    /// 入力ファイルを推論して結果を保存・表示
    Run {
        input: PathBuf,
        /// None のときは保存しない
        output_dir: Option<PathBuf>,
        /// 2 回目の推論に渡す前回結果ファイル
        prior: Option<PathBuf>,
        profile: Option<ProviderName>,
        model: Option<ModelName>,
    },
}

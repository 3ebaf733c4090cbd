//! confidence コマンドの enum（Command Pattern）

use common::domain::AgentName;
use std::path::PathBuf;

/// 確信度ラベルの取得元
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSource {
    /// 引数で直接指定（未指定は None）
    Given(Option<String>),
    /// result.json の confidence_level を読む
    ResultFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceCommand {
    Help,
    Relay { label: LabelSource, agent: AgentName },
}

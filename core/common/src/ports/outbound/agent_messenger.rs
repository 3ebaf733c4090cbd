//! 会話エージェントへのメッセージ送信 Outbound ポート
//!
//! エージェントはプラットフォーム側で状態を持つ。返信本文は利用しないため戻り値は `()`。

use crate::domain::AgentId;
use crate::error::Error;

/// 会話エージェントへ user ロールのテキストを 1 件送る
///
/// 実装は `common::agent::LettaAgentClient` やテスト用の記録モックなど。
pub trait AgentMessenger: Send + Sync {
    fn send_user_message(&self, agent_id: &AgentId, text: &str) -> Result<(), Error>;
}

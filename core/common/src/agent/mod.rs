//! 会話エージェント（Letta）への接続
//!
//! profiles.json の agents と環境変数から接続先を解決し、AgentMessenger の実装を提供する。

pub mod letta;

pub use letta::LettaAgentClient;

use crate::domain::{AgentId, AgentName};
use crate::error::Error;
use crate::llm::config::ProfilesConfig;
use crate::ports::outbound::EnvResolver;

pub const DEFAULT_AGENT_BASE_URL: &str = "https://api.letta.com";
const DEFAULT_API_KEY_ENV: &str = "LETTA_API_KEY";
const BASE_URL_ENV: &str = "LETTA_BASE_URL";

/// 解決済みエージェント接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAgent {
    pub name: String,
    pub agent_id: AgentId,
    pub base_url: String,
    pub api_key: Option<String>,
}

/// エージェント ID を読む既定の環境変数名（confidence → CONFIDENCE_AGENT_ID）
pub fn default_agent_id_env(name: &AgentName) -> String {
    format!("{}_AGENT_ID", name.to_uppercase().replace('-', "_"))
}

/// エージェント名から接続先を解決する
///
/// 優先順位:
/// - agent_id: profiles.json の agent_id → agent_id_env の環境変数 → `<NAME>_AGENT_ID`
/// - base_url: profiles.json → LETTA_BASE_URL → DEFAULT_AGENT_BASE_URL
/// - api_key: api_key_env の環境変数 → LETTA_API_KEY
///
/// ID が解決できなければ Error::env。
pub fn resolve_agent(
    name: &AgentName,
    cfg: Option<&ProfilesConfig>,
    env: &dyn EnvResolver,
) -> Result<ResolvedAgent, Error> {
    let profile = cfg
        .and_then(|c| c.agents.get(name.as_ref()))
        .cloned()
        .unwrap_or_default();

    let id_env = profile
        .agent_id_env
        .clone()
        .unwrap_or_else(|| default_agent_id_env(name));
    let agent_id = profile
        .agent_id
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| env.var(&id_env))
        .ok_or_else(|| {
            Error::env(format!(
                "No agent id for '{}': set {} or agents.{}.agent_id in profiles.json",
                name, id_env, name
            ))
        })?;

    let base_url = profile
        .base_url
        .clone()
        .or_else(|| env.var(BASE_URL_ENV))
        .unwrap_or_else(|| DEFAULT_AGENT_BASE_URL.to_string());
    let api_key = env.var(profile.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV));

    Ok(ResolvedAgent {
        name: name.to_string(),
        agent_id: AgentId::new(agent_id),
        base_url,
        api_key,
    })
}

//! LLM プロバイダの実装
//!
//! Chat Completions 互換のエンドポイント（Perplexity / OpenAI / 任意の base_url）と、
//! ネットワークを使わない echo プロバイダを同じトレイトで扱う。

pub mod config;
pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod provider;
pub mod resolver;

pub use config::{AgentProfile, ProfilesConfig, ProviderProfile, ProviderTypeKind};
pub use factory::{create_provider, AnyProvider, ProviderType};
pub use provider::{LlmProvider, ResponseFormat};
pub use resolver::{list_available_profiles, load_profiles_config, resolve_provider, ResolvedProvider};

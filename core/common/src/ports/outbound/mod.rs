//! Outbound ポート: アプリが外界（FS・環境変数・時刻・ログ・LLM・エージェント）を使うための trait

pub mod agent_messenger;
pub mod clock;
pub mod env_resolver;
pub mod fs;
pub mod llm_provider;
pub mod log;

pub use agent_messenger::AgentMessenger;
pub use clock::{iso8601_millis, Clock};
pub use env_resolver::EnvResolver;
pub use fs::{FileMetadata, FileSystem};
pub use llm_provider::LlmProvider;
pub use log::{now_iso8601, Log, LogLevel, LogRecord};

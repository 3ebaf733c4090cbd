//! 配線: 標準アダプタで App を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StderrLog, StdClock, StdEnvResolver, StdFileSystem, TeeLog};
use common::agent::{resolve_agent, LettaAgentClient};
use common::domain::AgentName;
use common::error::Error;
use common::llm::load_profiles_config;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log};

use crate::usecase::RelayUseCase;

/// ログファイル名（<home>/log/confidence.jsonl）
const LOG_FILE: &str = "confidence.jsonl";

pub struct App {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub clock: Arc<dyn Clock>,
    pub logger: Arc<dyn Log>,
}

impl App {
    /// エージェントを解決し、HTTP クライアントを 1 つ作って RelayUseCase を組み立てる
    pub fn relay_use_case(&self, agent: &AgentName) -> Result<RelayUseCase, Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_agent(agent, cfg.as_ref(), self.env_resolver.as_ref())?;
        let client = LettaAgentClient::new(resolved.base_url, resolved.api_key)?;
        Ok(RelayUseCase::new(
            Arc::new(client),
            resolved.agent_id,
            Arc::clone(&self.clock),
            Arc::clone(&self.logger),
        ))
    }
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_confidence(verbose: bool) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let file_log: Arc<dyn Log> = match env_resolver.resolve_home_dir() {
        Ok(home) => Arc::new(FileJsonLog::new(Arc::clone(&fs), home.log_dir().join(LOG_FILE))),
        Err(_) => Arc::new(NoopLog),
    };
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(TeeLog::new(vec![file_log, Arc::new(StderrLog)]))
    } else {
        file_log
    };
    App {
        fs,
        env_resolver,
        clock: Arc::new(StdClock),
        logger,
    }
}

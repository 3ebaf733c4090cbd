//! 配線: 標準アダプタで App を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StderrLog, StdEnvResolver, StdFileSystem, TeeLog};
use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::llm::{create_provider, list_available_profiles, load_profiles_config, resolve_provider, LlmProvider};
use common::ports::outbound::{EnvResolver, FileSystem, Log};

use crate::adapter::{FsCaseStore, ReasoningClient};
use crate::usecase::IdentifyUseCase;

/// ログファイル名（<home>/log/identify.jsonl）
const LOG_FILE: &str = "identify.jsonl";

/// プロセス内で共有する標準アダプタ
pub struct App {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub logger: Arc<dyn Log>,
}

impl App {
    /// プロファイル一覧と default
    pub fn list_profiles(&self) -> Result<(Vec<String>, Option<String>), Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        Ok(list_available_profiles(cfg.as_ref()))
    }

    /// プロファイルを解決し、プロバイダ（HTTP クライアント込み）を 1 つ作って IdentifyUseCase を組み立てる
    pub fn identify_use_case(
        &self,
        profile: Option<&ProviderName>,
        model: Option<&ModelName>,
    ) -> Result<IdentifyUseCase, Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_provider(profile, cfg.as_ref())?;
        let provider: Arc<dyn LlmProvider> =
            Arc::new(create_provider(&resolved, model, self.env_resolver.as_ref())?);
        Ok(self.identify_use_case_with(provider))
    }

    /// 任意のプロバイダで IdentifyUseCase を組み立てる
    pub fn identify_use_case_with(&self, provider: Arc<dyn LlmProvider>) -> IdentifyUseCase {
        let reasoner = Arc::new(ReasoningClient::new(provider, Arc::clone(&self.logger)));
        let store = Arc::new(FsCaseStore::new(Arc::clone(&self.fs)));
        IdentifyUseCase::new(reasoner, store, Arc::clone(&self.logger))
    }
}

/// 配線: 標準アダプタで App を組み立てる
///
/// ホームが解決できないときはファイルログを出さない。
pub fn wire_identify(verbose: bool) -> App {
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
        logger,
    }
}

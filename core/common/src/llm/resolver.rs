//! profiles.json の読み込みとプロバイダ解決

use crate::domain::ProviderName;
use crate::error::Error;
use crate::llm::config::{ProfilesConfig, ProviderTypeKind};
use crate::llm::factory::ProviderType;
use crate::ports::outbound::{EnvResolver, FileSystem};

/// プロファイル未指定・default 未設定のときに使うプロバイダ
pub const DEFAULT_PROVIDER: &str = "perplexity";

/// 解決済みプロバイダ（ProviderType + オプション）
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（例: "local", "perplexity"）。ログ・エラー表示用
    pub profile_name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

/// profiles.json を読み込む。ファイルが無ければ Ok(None)、JSON が壊れていれば Err（メッセージにパス含める）
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
) -> Result<Option<ProfilesConfig>, Error> {
    let path = env.resolve_home_dir()?.profiles_path();
    if !fs.exists(path.as_path()) {
        return Ok(None);
    }
    let contents = fs.read_to_string(path.as_path())?;
    ProfilesConfig::parse(&contents)
        .map_err(|e| Error::json(format!("{}: {}", path.display(), e)))
        .map(Some)
}

fn provider_type_kind_to_provider_type(k: ProviderTypeKind) -> ProviderType {
    match k {
        ProviderTypeKind::Perplexity => ProviderType::Perplexity,
        ProviderTypeKind::Openai => ProviderType::OpenAi,
        ProviderTypeKind::OpenaiCompat => ProviderType::OpenAiCompat,
        ProviderTypeKind::Echo => ProviderType::Echo,
    }
}

/// 利用可能なビルトインプロバイダ名
fn builtin_provider_names() -> &'static [&'static str] {
    &["perplexity", "openai", "openai_compat", "echo"]
}

/// 利用可能なプロファイル名（ソート済み）と default プロファイル名
pub fn list_available_profiles(cfg: Option<&ProfilesConfig>) -> (Vec<String>, Option<String>) {
    let mut names: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        for k in cfg.providers.keys() {
            if !names.contains(k) {
                names.push(k.clone());
            }
        }
    }
    names.sort();
    let default = cfg
        .and_then(|c| c.default_provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    (names, Some(default))
}

/// 要求されたプロバイダ名（None の場合は default）と ProfilesConfig から ResolvedProvider を解決する。
/// 不明なプロバイダの場合は Error::invalid_argument（is_usage == true）で利用可能一覧を返す。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let effective_name: &str = requested.map(|r| r.as_ref()).unwrap_or_else(|| {
        cfg.and_then(|c| c.default_provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    });

    // 1) cfg.providers に名前があればそれを優先
    if let Some(profile) = cfg.and_then(|c| c.providers.get(effective_name)) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type: provider_type_kind_to_provider_type(profile.type_),
            base_url: profile.base_url.clone(),
            model: profile.model.clone(),
            api_key_env: profile.api_key_env.clone(),
            temperature: profile.temperature,
        });
    }

    // 2) ビルトイン
    if let Some(provider_type) = ProviderType::from_str(effective_name) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
        });
    }

    // 3) どれも無ければ usage エラー
    let (available, _) = list_available_profiles(cfg);
    Err(Error::invalid_argument(format!(
        "Unknown provider: '{}'. Available: {}",
        effective_name,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::domain::HomeDir;
    use crate::llm::config::ProviderProfile;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct HomeEnv(PathBuf);

    impl EnvResolver for HomeEnv {
        fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
            Ok(HomeDir::new(self.0.clone()))
        }

        fn var(&self, _name: &str) -> Option<String> {
            None
        }
    }

    fn profile(type_: ProviderTypeKind) -> ProviderProfile {
        ProviderProfile {
            type_,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
        }
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_none() {
        let r = resolve_provider(None, None).unwrap();
        assert_eq!(r.profile_name, "perplexity");
        assert_eq!(r.provider_type, ProviderType::Perplexity);
        assert!(r.model.is_none());
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_echo() {
        let name = ProviderName::new("echo");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::Echo);
    }

    #[test]
    fn test_resolve_provider_no_cfg_unknown() {
        let name = ProviderName::new("unknown_provider");
        let e = resolve_provider(Some(&name), None).unwrap_err();
        assert!(e.is_usage());
        assert!(e.to_string().contains("Unknown provider"));
        assert!(e.to_string().contains("unknown_provider"));
        assert!(e.to_string().contains("Available"));
    }

    #[test]
    fn test_resolve_provider_cfg_default_provider() {
        let mut providers = HashMap::new();
        providers.insert(
            "my_openai".to_string(),
            ProviderProfile {
                type_: ProviderTypeKind::Openai,
                base_url: Some("https://my.api/v1".to_string()),
                model: Some("gpt-4".to_string()),
                api_key_env: Some("MY_KEY".to_string()),
                temperature: Some(0.7),
            },
        );
        let cfg = ProfilesConfig {
            default_provider: Some("my_openai".to_string()),
            providers,
            agents: HashMap::new(),
        };
        let r = resolve_provider(None, Some(&cfg)).unwrap();
        assert_eq!(r.profile_name, "my_openai");
        assert_eq!(r.provider_type, ProviderType::OpenAi);
        assert_eq!(r.base_url.as_deref(), Some("https://my.api/v1"));
        assert_eq!(r.model.as_deref(), Some("gpt-4"));
        assert_eq!(r.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(r.temperature, Some(0.7));
    }

    #[test]
    fn test_resolve_provider_cfg_unknown_provider_lists_available() {
        let mut providers = HashMap::new();
        providers.insert("my_custom".to_string(), profile(ProviderTypeKind::Echo));
        let cfg = ProfilesConfig {
            default_provider: None,
            providers,
            agents: HashMap::new(),
        };
        let name = ProviderName::new("nonexistent");
        let e = resolve_provider(Some(&name), Some(&cfg)).unwrap_err();
        assert!(e.is_usage());
        let msg = e.to_string();
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("my_custom"));
        assert!(msg.contains("perplexity"));
    }

    #[test]
    fn test_list_available_profiles() {
        let mut providers = HashMap::new();
        providers.insert("local".to_string(), profile(ProviderTypeKind::OpenaiCompat));
        let cfg = ProfilesConfig {
            default_provider: Some("local".to_string()),
            providers,
            agents: HashMap::new(),
        };
        let (names, default) = list_available_profiles(Some(&cfg));
        assert_eq!(names, vec!["echo", "local", "openai", "openai_compat", "perplexity"]);
        assert_eq!(default.as_deref(), Some("local"));
        let (_, default) = list_available_profiles(None);
        assert_eq!(default.as_deref(), Some("perplexity"));
    }

    #[test]
    fn test_load_profiles_config_missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let env = HomeEnv(tmp.path().to_path_buf());
        let cfg = load_profiles_config(&StdFileSystem, &env).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn test_load_profiles_config_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("profiles.json"),
            r#"{"default_provider": "echo", "providers": {}}"#,
        )
        .unwrap();
        let env = HomeEnv(tmp.path().to_path_buf());
        let cfg = load_profiles_config(&StdFileSystem, &env).unwrap().unwrap();
        assert_eq!(cfg.default_provider.as_deref(), Some("echo"));
    }

    #[test]
    fn test_load_profiles_config_broken_json_mentions_path() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("profiles.json"), "{ not json").unwrap();
        let env = HomeEnv(tmp.path().to_path_buf());
        let e = load_profiles_config(&StdFileSystem, &env).unwrap_err();
        assert!(matches!(e, Error::Json(_)));
        assert!(e.to_string().contains("profiles.json"));
    }
}

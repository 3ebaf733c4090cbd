//! プロバイダファクトリー
//!
//! 解決済みプロファイルから実際のプロバイダを作成する。API キーはここで環境変数から読む。

use crate::domain::ModelName;
use crate::error::Error;
use crate::llm::echo::EchoProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::{LlmProvider, ResponseFormat};
use crate::llm::resolver::ResolvedProvider;
use crate::ports::outbound::EnvResolver;
use serde_json::Value;

pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
pub const PERPLEXITY_MODEL: &str = "sonar-pro";

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// Perplexity（検索付き Chat Completions）
    Perplexity,
    /// OpenAI
    OpenAi,
    /// OpenAI Chat Completions 互換 (/chat/completions)
    OpenAiCompat,
    /// Echo（API を呼ばない）
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "perplexity" | "pplx" => Some(Self::Perplexity),
            "openai" | "gpt" => Some(Self::OpenAi),
            "openai_compat" => Some(Self::OpenAiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perplexity => "perplexity",
            Self::OpenAi => "openai",
            Self::OpenAiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }

    fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Perplexity => Some(PERPLEXITY_BASE_URL),
            _ => None,
        }
    }

    fn default_model(&self) -> Option<&'static str> {
        match self {
            Self::Perplexity => Some(PERPLEXITY_MODEL),
            _ => None,
        }
    }

    fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Perplexity => Some("PERPLEXITY_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::OpenAiCompat | Self::Echo => None,
        }
    }

    fn default_temperature(&self) -> Option<f32> {
        match self {
            Self::Perplexity => Some(0.2),
            _ => None,
        }
    }
}

/// プロバイダの enum ラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用する。
pub enum AnyProvider {
    OpenAiCompat(OpenAiCompatProvider),
    Echo(EchoProvider),
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::OpenAiCompat(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Value, Error> {
        match self {
            Self::OpenAiCompat(p) => p.make_request_payload(query, system_instruction, response_format),
            Self::Echo(p) => p.make_request_payload(query, system_instruction, response_format),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::OpenAiCompat(p) => p.make_http_request(request_json),
            Self::Echo(p) => p.make_http_request(request_json),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::OpenAiCompat(p) => p.parse_response_text(response_json),
            Self::Echo(p) => p.parse_response_text(response_json),
        }
    }
}

/// 解決済みプロファイルからプロバイダを作成
///
/// * `model` - 明示指定されたモデル（プロファイルのモデルより優先）
///
/// API キーの環境変数が未設定でもエラーにしない（送信時に認証エラーとして扱われる）。
pub fn create_provider(
    resolved: &ResolvedProvider,
    model: Option<&ModelName>,
    env: &dyn EnvResolver,
) -> Result<AnyProvider, Error> {
    let provider_type = resolved.provider_type;
    if provider_type == ProviderType::Echo {
        return Ok(AnyProvider::Echo(EchoProvider::new()));
    }

    let model = model
        .map(|m| m.to_string())
        .or_else(|| resolved.model.clone())
        .or_else(|| provider_type.default_model().map(str::to_string));
    let base_url = resolved
        .base_url
        .clone()
        .or_else(|| provider_type.default_base_url().map(str::to_string));
    let api_key = resolved
        .api_key_env
        .as_deref()
        .or(provider_type.default_api_key_env())
        .and_then(|name| env.var(name));
    let temperature = resolved
        .temperature
        .or(provider_type.default_temperature());

    Ok(AnyProvider::OpenAiCompat(OpenAiCompatProvider::new(
        model,
        base_url,
        api_key,
        temperature,
    )?))
}

//! Provider Settings
//!
//! Which text-generation backend to use and how to reach it, read once
//! from the environment and passed explicitly to the factory.

use std::str::FromStr;

use advisor_core::AgentError;

/// Named provider variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Mock,
}

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            other => Err(AgentError::Config(format!("Unknown LLM provider: {other}"))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text-generation settings
#[derive(Clone, Debug)]
pub struct LlmSettings {
    /// Requested provider
    pub provider: ProviderKind,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Retry failed real-provider calls against the mock
    pub failover_to_mock: bool,
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            timeout_secs: 30,
            failover_to_mock: false,
        }
    }
}

impl LlmSettings {
    /// Read settings from `LLM_PROVIDER`, `GEMINI_*`, `OPENAI_*` and
    /// `LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AgentError> {
        let defaults = Self::default();

        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => defaults.provider,
        };

        Ok(Self {
            provider,
            gemini_api_key: non_empty_env("GEMINI_API_KEY"),
            gemini_model: non_empty_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty_env("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_model: non_empty_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: non_empty_env("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            timeout_secs: non_empty_env("LLM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            failover_to_mock: non_empty_env("LLM_FAILOVER_TO_MOCK")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.failover_to_mock),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" openai ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("anthropic".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = LlmSettings::default();
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.gemini_model, "gemini-1.5-flash");
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert!(!settings.failover_to_mock);
    }
}

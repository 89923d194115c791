//! # advisor-runtime
//!
//! Text-generation providers for the readiness advisor.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google `generateContent` API
//! - **OpenAI**: Chat Completions API
//! - **Mock**: canned offline responses, used whenever no API key is set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use advisor_runtime::{LlmSettings, build_provider};
//!
//! let settings = LlmSettings::from_env()?;
//! let provider = build_provider(&settings);
//! let generation = advisor_core::generate(provider.as_ref(), "Explain SIPs", &Default::default()).await;
//! ```

use std::sync::Arc;

pub mod config;
mod http;
pub mod mock;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "openai")]
pub mod openai;

pub use config::{LlmSettings, ProviderKind};
pub use mock::MockProvider;

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;

#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

// Re-export core types for convenience
pub use advisor_core::{
    AgentError, Generation, GenerationOptions, LlmProvider, Message, ProviderChain,
    ProviderStrategy, Result, Role, generate,
};

/// Build the configured provider.
///
/// Falls back to [`MockProvider`] when the requested backend has no API key
/// or cannot be constructed. With `failover_to_mock` set, a real provider is
/// wrapped in a failover chain that ends at the mock.
pub fn build_provider(settings: &LlmSettings) -> Arc<dyn LlmProvider> {
    let primary = match build_primary(settings) {
        Ok(Some(provider)) => provider,
        Ok(None) => return Arc::new(MockProvider::new()),
        Err(e) => {
            tracing::warn!(
                "Failed to initialise {} provider, using mock: {}",
                settings.provider,
                e
            );
            return Arc::new(MockProvider::new());
        }
    };

    tracing::info!(
        "Using {} provider ({})",
        primary.name(),
        primary.info().default_model
    );

    if settings.failover_to_mock {
        Arc::new(ProviderChain::new(
            vec![primary, Arc::new(MockProvider::new())],
            ProviderStrategy::Failover,
        ))
    } else {
        primary
    }
}

/// `Ok(None)` means "use the mock" without it being an error.
fn build_primary(settings: &LlmSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    match settings.provider {
        ProviderKind::Mock => Ok(None),
        ProviderKind::Gemini => {
            if settings.gemini_api_key.is_none() {
                tracing::warn!("GEMINI_API_KEY not set, using mock provider");
                return Ok(None);
            }
            build_gemini(settings)
        }
        ProviderKind::OpenAi => {
            if settings.openai_api_key.is_none() {
                tracing::warn!("OPENAI_API_KEY not set, using mock provider");
                return Ok(None);
            }
            build_openai(settings)
        }
    }
}

#[cfg(feature = "gemini")]
fn build_gemini(settings: &LlmSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    Ok(Some(Arc::new(GeminiProvider::from_settings(settings)?)))
}

#[cfg(not(feature = "gemini"))]
fn build_gemini(_settings: &LlmSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    Err(AgentError::Config("gemini support not compiled in".into()))
}

#[cfg(feature = "openai")]
fn build_openai(settings: &LlmSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    Ok(Some(Arc::new(OpenAiProvider::from_settings(settings)?)))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_settings: &LlmSettings) -> Result<Option<Arc<dyn LlmProvider>>> {
    Err(AgentError::Config("openai support not compiled in".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_falls_back_to_mock() {
        let settings = LlmSettings::default();
        assert_eq!(build_provider(&settings).name(), "mock");

        let settings = LlmSettings {
            provider: ProviderKind::OpenAi,
            ..LlmSettings::default()
        };
        assert_eq!(build_provider(&settings).name(), "mock");
    }

    #[test]
    fn test_explicit_mock() {
        let settings = LlmSettings {
            provider: ProviderKind::Mock,
            gemini_api_key: Some("ignored".into()),
            ..LlmSettings::default()
        };
        assert_eq!(build_provider(&settings).name(), "mock");
    }

    #[test]
    fn test_failover_chain_wraps_real_provider() {
        let settings = LlmSettings {
            gemini_api_key: Some("test-key".into()),
            failover_to_mock: true,
            ..LlmSettings::default()
        };
        let provider = build_provider(&settings);
        assert_eq!(provider.info().default_model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_generate_with_mock() {
        let provider = build_provider(&LlmSettings::default());
        let generation = generate(
            provider.as_ref(),
            "Explain today's market",
            &GenerationOptions::default(),
        )
        .await;
        assert!(generation.success);
        assert_eq!(generation.provider, "mock");
    }
}

//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for every text-generation backend (Gemini,
//! OpenAI, the offline mock) so the advice layer can work with any of them
//! without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use advisor_core::provider::{generate, GenerationOptions, LlmProvider};
//!
//! let provider = GeminiProvider::from_settings(&settings)?;
//! let outcome = generate(&provider, &prompt, &GenerationOptions::default()).await;
//! if outcome.success { println!("{}", outcome.text); }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::message::Message;

/// System prompt shared by providers that accept one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful financial advisor for Indian investors.";

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model override; providers fall back to their configured model when `None`
    #[serde(default)]
    pub model: Option<String>,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System prompt (if provider supports it separately)
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Upper bound on a single provider call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_temperature() -> f32 {
    0.7
}
const fn default_max_tokens() -> u32 {
    500
}
const fn default_timeout_secs() -> u64 {
    30
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.into()),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Provider that produced it (e.g. "gemini", "openai", "mock")
    pub provider: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Whether the response was truncated
    pub truncated: bool,
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Provider metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "openai")
    pub name: String,

    /// Model used when options carry no override
    pub default_model: String,

    /// Whether a separate system prompt is honoured
    pub supports_system_prompt: bool,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The advice layer works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used for provenance ("gemini", "openai", "mock")
    fn name(&self) -> &str;

    /// Get provider information and capabilities
    fn info(&self) -> ProviderInfo;

    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(&self, messages: &[Message], options: &GenerationOptions)
    -> Result<Completion>;
}

/// Outcome of a single best-effort generation.
///
/// Never an error: failures are reported through `success = false` and
/// `error`, so callers can fall back to default text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Generation {
    pub success: bool,
    pub text: String,
    pub provider: String,
    pub model: Option<String>,
    pub latency_ms: u64,
    pub tokens_used: Option<u32>,
    pub error: Option<String>,
}

impl Generation {
    /// Text when the call succeeded with non-empty output, otherwise `fallback`
    pub fn text_or(&self, fallback: &str) -> String {
        if self.success && !self.text.trim().is_empty() {
            self.text.clone()
        } else {
            fallback.to_string()
        }
    }

    /// Provider name when the call succeeded, otherwise "unknown"
    pub fn provider_or_unknown(&self) -> String {
        if self.success {
            self.provider.clone()
        } else {
            "unknown".into()
        }
    }
}

/// Run a single prompt through `provider`, timing it and capturing failures.
pub async fn generate(
    provider: &dyn LlmProvider,
    prompt: &str,
    options: &GenerationOptions,
) -> Generation {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &options.system_prompt {
        messages.push(Message::system(system.clone()));
    }
    messages.push(Message::user(prompt));

    let started = Instant::now();
    let result = complete_with_timeout(provider, &messages, options).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(completion) => Generation {
            success: true,
            text: completion.content,
            provider: completion.provider,
            model: Some(completion.model),
            latency_ms,
            tokens_used: completion.usage.map(|u| u.total_tokens),
            error: None,
        },
        Err(e) => {
            tracing::warn!(provider = %provider.name(), error = %e, "Text generation failed");
            Generation {
                success: false,
                text: String::new(),
                provider: provider.name().to_string(),
                model: None,
                latency_ms,
                tokens_used: None,
                error: Some(e.user_message()),
            }
        }
    }
}

async fn complete_with_timeout(
    provider: &dyn LlmProvider,
    messages: &[Message],
    options: &GenerationOptions,
) -> Result<Completion> {
    let limit = Duration::from_secs(options.timeout_secs);
    tokio::time::timeout(limit, provider.complete(messages, options))
        .await
        .map_err(|_| AgentError::Timeout(options.timeout_secs))?
}

/// Provider selection strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderStrategy {
    /// Use a single provider
    Single,

    /// Failover to next provider on error
    Failover,

    /// Round-robin load balancing
    RoundRobin,
}

/// Multi-provider wrapper with failover support
pub struct ProviderChain {
    providers: Vec<Arc<dyn LlmProvider>>,
    strategy: ProviderStrategy,
    current_index: AtomicUsize,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>, strategy: ProviderStrategy) -> Self {
        Self {
            providers,
            strategy,
            current_index: AtomicUsize::new(0),
        }
    }

    /// Get the next provider based on strategy
    pub fn next_provider(&self) -> Option<&dyn LlmProvider> {
        if self.providers.is_empty() {
            return None;
        }

        let idx = match self.strategy {
            ProviderStrategy::Single => 0,
            ProviderStrategy::RoundRobin => self.current_index.fetch_add(1, Ordering::SeqCst),
            ProviderStrategy::Failover => self.current_index.load(Ordering::SeqCst),
        };
        Some(self.providers[idx % self.providers.len()].as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl LlmProvider for ProviderChain {
    fn name(&self) -> &str {
        self.next_provider().map_or("chain", |p| p.name())
    }

    fn info(&self) -> ProviderInfo {
        self.next_provider().map_or_else(
            || ProviderInfo {
                name: "chain".into(),
                default_model: String::new(),
                supports_system_prompt: false,
            },
            |p| p.info(),
        )
    }

    async fn health_check(&self) -> Result<bool> {
        for provider in &self.providers {
            if provider.health_check().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        if self.strategy != ProviderStrategy::Failover {
            let Some(provider) = self.next_provider() else {
                return Err(AgentError::Config("Provider chain is empty".into()));
            };
            return provider.complete(messages, options).await;
        }

        // each call walks the chain from the index it observed
        let len = self.providers.len();
        let start = self.current_index.load(Ordering::SeqCst);
        let mut last_error = AgentError::Config("Provider chain is empty".into());
        for offset in 0..len {
            let idx = (start + offset) % len;
            let provider = &self.providers[idx];
            match provider.complete(messages, options).await {
                Ok(completion) => {
                    if idx != start % len {
                        // a concurrent call may already have moved the chain on
                        let _ = self.current_index.compare_exchange(
                            start,
                            idx,
                            Ordering::SeqCst,
                            Ordering::SeqCst,
                        );
                    }
                    return Ok(completion);
                }
                Err(e) => {
                    tracing::warn!(provider = %provider.name(), error = %e, "Provider failed, trying next");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

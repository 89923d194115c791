//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` over the Chat Completions API.

use advisor_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, GenerationOptions, LlmProvider, ProviderInfo, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::http::{build_client, status_error, transport_error};

/// OpenAI LLM provider
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create from settings; fails when no API key is configured
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings
            .openai_api_key
            .clone()
            .ok_or_else(|| AgentError::Config("OPENAI_API_KEY is not set".into()))?;

        Ok(Self {
            http: build_client(settings.timeout_secs)?,
            api_key,
            model: settings.openai_model.clone(),
            base_url: settings.openai_base_url.clone(),
        })
    }

    fn build_request<'a>(
        messages: &'a [Message],
        options: &GenerationOptions,
        model: &'a str,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.to_string(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }

    fn convert_response(response: ChatResponse) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Parse("OpenAI returned no choices".into()))?;

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            provider: "openai".into(),
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            truncated: choice.finish_reason.as_deref() == Some("length"),
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "openai".into(),
            default_model: self.model.clone(),
            supports_system_prompt: true,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1/models", self.base_url.trim_end_matches('/'));
        match self.http.get(url).bearer_auth(&self.api_key).send().await {
            Ok(res) => Ok(res.status().is_success()),
            Err(e) => {
                tracing::warn!("OpenAI health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let model = options.model.as_deref().unwrap_or(&self.model);
        let request = Self::build_request(messages, options, model);
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("openai", &e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error("openai", &e))?;
        if !status.is_success() {
            return Err(status_error("openai", status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Self::convert_response(parsed)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

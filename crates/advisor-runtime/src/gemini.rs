//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Gemini `generateContent` REST API.

use advisor_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, GenerationOptions, LlmProvider, ProviderInfo, TokenUsage},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::http::{build_client, status_error, transport_error};

/// Gemini LLM provider
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create from settings; fails when no API key is configured
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings
            .gemini_api_key
            .clone()
            .ok_or_else(|| AgentError::Config("GEMINI_API_KEY is not set".into()))?;

        Ok(Self {
            http: build_client(settings.timeout_secs)?,
            api_key,
            model: settings.gemini_model.clone(),
            base_url: settings.gemini_base_url.clone(),
        })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Convert messages to Gemini format: system text goes to
    /// `systemInstruction`, the rest become `contents`.
    fn build_request(messages: &[Message], options: &GenerationOptions) -> GenerateContentRequest {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| Content {
                role: Some(if m.role == Role::Assistant { "model" } else { "user" }.into()),
                parts: vec![Part { text: m.content.clone() }],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: (!system_text.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part { text: system_text.join("\n") }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
            },
        }
    }

    fn convert_response(response: GenerateContentResponse, model: &str) -> Result<Completion> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Parse("Gemini returned no candidates".into()))?;

        let content = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        Ok(Completion {
            content,
            provider: "gemini".into(),
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            truncated: candidate.finish_reason.as_deref() == Some("MAX_TOKENS"),
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "gemini".into(),
            default_model: self.model.clone(),
            supports_system_prompt: true,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1beta/models", self.base_url.trim_end_matches('/'));
        match self.http.get(url).query(&[("key", &self.api_key)]).send().await {
            Ok(res) => Ok(res.status().is_success()),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
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
        let request = Self::build_request(messages, options);

        let res = self
            .http
            .post(self.url(model))
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("gemini", &e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error("gemini", &e))?;
        if !status.is_success() {
            return Err(status_error("gemini", status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        Self::convert_response(parsed, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

//! Mock LLM Provider
//!
//! Offline provider for demos and tests. Returns canned text chosen by the
//! kind of prompt it receives.

use advisor_core::{
    error::Result,
    message::{Message, Role},
    provider::{Completion, GenerationOptions, LlmProvider, ProviderInfo},
};
use async_trait::async_trait;

const MARKET_TEXT: &str = "Aaj market mildly stable hai. IT stocks thoda upar gaye, earnings strong thi. \
Banking steady hai after RBI's rate pause. FMCG thoda down due to rising input costs. \
Overall, a calm day for investors.";

const ADVICE_TEXT: &str = "Based on your profile, here's my guidance:\n\
• SIPs: Continue your SIPs as planned\n\
• Lump-sum: Avoid large lump-sum entries this week\n\
• Long-term investors: Stable climate, stick to your strategy\n\
• High-vol traders: Stay cautious in current conditions";

const SECTOR_TEXT: &str = "IT Services: Strong quarterly earnings driving positive sentiment.\n\
Banking: Mixed results but stable after RBI policy update.\n\
FMCG: Raw material cost pressure causing headwinds.";

const EDUCATION_TEXT: &str = "Understanding Volatility:\n\
• Volatility measures how much prices move up and down\n\
• High volatility = bigger swings, more risk\n\
• Low volatility = steadier prices, less risk\n\
• Long-term investors can often ignore short-term volatility\n\
• SIPs actually benefit from volatility through rupee cost averaging";

const PATTERN_TEXT: &str = "Today's Pattern: Post-Earnings Drift\n\
Sometimes, a stock keeps rising slowly for days after good news. \
We'll show you when this happens and how to identify it.";

const GENERIC_TEXT: &str = "I'm here to help you understand the market and make informed decisions. \
What would you like to know about investing?";

/// Mock provider with canned responses
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider;

impl MockProvider {
    pub const fn new() -> Self {
        Self
    }

    /// Pick a canned response for the latest user prompt
    fn respond(prompt: &str) -> &'static str {
        let prompt = prompt.to_lowercase();

        if prompt.contains("pattern") {
            PATTERN_TEXT
        } else if prompt.contains("sip") {
            ADVICE_TEXT
        } else if prompt.contains("market") && (prompt.contains("explain") || prompt.contains("today")) {
            MARKET_TEXT
        } else if prompt.contains("sector") {
            SECTOR_TEXT
        } else if prompt.contains("explain") || prompt.contains("volatility") {
            EDUCATION_TEXT
        } else {
            GENERIC_TEXT
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "mock".into(),
            default_model: "mock-v1".into(),
            supports_system_prompt: false,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true) // Mock always healthy
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map_or("", |m| m.content.as_str());

        Ok(Completion {
            content: Self::respond(prompt).to_string(),
            provider: "mock".into(),
            model: "mock-v1".into(),
            usage: None,
            truncated: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn reply(prompt: &str) -> String {
        MockProvider::new()
            .complete(&[Message::system("You advise investors."), Message::user(prompt)], &GenerationOptions::default())
            .await
            .unwrap()
            .content
    }

    #[tokio::test]
    async fn test_advice_prompt_gets_advice() {
        let text = reply("Provide specific guidance for:\n1. SIPs (Systematic Investment Plans)").await;
        assert!(text.contains("SIPs: Continue"));
    }

    #[tokio::test]
    async fn test_market_prompt_gets_market_text() {
        let text = reply("Explain today's Indian stock market movement").await;
        assert!(text.starts_with("Aaj market"));
    }

    #[tokio::test]
    async fn test_pattern_beats_market_keywords() {
        let text = reply("Describe a market pattern or insight for today").await;
        assert!(text.starts_with("Today's Pattern"));
    }

    #[tokio::test]
    async fn test_system_prompt_is_ignored_for_routing() {
        let text = reply("hello").await;
        assert!(text.starts_with("I'm here to help"));
    }
}

//! Advice orchestration against a scripted text-generation provider

use std::sync::{Arc, Mutex};

use advisor_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, ProviderInfo};
use async_trait::async_trait;
use chrono::NaiveDate;
use readiness_advisor::advice::AdviceEngine;
use readiness_advisor::market::{MockMarketDataProvider, Tone};
use readiness_advisor::{
    FinancialMetrics, MarketDataService, MarketRiskLevel, ReadinessEngine, RiskLevel, RiskProfile,
};
use rust_decimal_macros::dec;

/// Replies with fixed text, or fails every call when `reply` is `None`
struct ScriptedProvider {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "scripted".into(),
            default_model: "script-1".into(),
            supports_system_prompt: true,
        }
    }

    async fn health_check(&self) -> advisor_core::Result<bool> {
        Ok(self.reply.is_some())
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> advisor_core::Result<Completion> {
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        let Some(reply) = &self.reply else {
            return Err(AgentError::ProviderUnavailable("scripted outage".into()));
        };
        Ok(Completion {
            content: reply.clone(),
            provider: "scripted".into(),
            model: "script-1".into(),
            usage: None,
            truncated: false,
        })
    }
}

fn market() -> Arc<MarketDataService> {
    let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    Arc::new(MarketDataService::new(
        Arc::new(MockMarketDataProvider::for_date(date)),
        None,
    ))
}

#[tokio::test]
async fn personalized_advice_is_parsed_from_reply() {
    let llm = ScriptedProvider::replying(
        "1. SIPs: keep your monthly SIP running\n\
         2. Lump-sum: split it over three months\n\
         3. Long-term: stay invested\n\
         4. Short-term traders: use strict stop losses",
    );
    let engine = AdviceEngine::new(llm.clone(), market());

    let financial = FinancialMetrics::new(dec!(50000), dec!(35000)).with_emergency_fund(dec!(90000));
    let profile = RiskProfile::new(RiskLevel::Conservative);
    let readiness = ReadinessEngine::default().calculate_score(&financial, Some(&profile), MarketRiskLevel::Medium);

    let advice = engine
        .personalized_advice(&readiness, Some(&profile), MarketRiskLevel::Medium)
        .await
        .unwrap();

    assert_eq!(advice.sips, "Keep your monthly sip running");
    assert_eq!(advice.lumpsum, "Split it over three months");
    assert_eq!(advice.long_term, "Stay invested");
    assert_eq!(advice.traders, "Short-term traders: use strict stop losses");
    assert_eq!(advice.provider, "scripted");

    let prompt = llm.last_prompt();
    assert!(prompt.contains(&format!("- Readiness Score: {}/100 (ALMOST_READY)", readiness.score)));
    assert!(prompt.contains("- Risk Profile: CONSERVATIVE"));
    assert!(prompt.contains("- Emergency Fund: 2.6 months coverage"));
    assert!(prompt.contains("- Market Risk: MEDIUM"));
}

#[tokio::test]
async fn failed_generation_falls_back_to_defaults() {
    let engine = AdviceEngine::new(ScriptedProvider::failing(), market());
    let readiness = ReadinessEngine::default().calculate_score(
        &FinancialMetrics::new(dec!(50000), dec!(35000)),
        None,
        MarketRiskLevel::High,
    );

    let advice = engine
        .personalized_advice(&readiness, None, MarketRiskLevel::High)
        .await
        .unwrap();
    assert_eq!(advice.sips, "Continue your SIPs as planned.");
    assert_eq!(advice.provider, "unknown");
    assert!(advice.raw_response.is_empty());

    let explanation = engine.market_explanation().await.unwrap();
    assert_eq!(explanation.summary, "Unable to generate market summary.");
    assert_eq!(explanation.provider, "unknown");

    let card = engine.education_card("rupee cost averaging").await.unwrap();
    assert_eq!(card.topic, "Rupee Cost Averaging");
    assert_eq!(card.content, "Unable to explain rupee cost averaging.");

    let sectors = engine.sector_insights().await.unwrap();
    assert_eq!(sectors.insight, "Unable to generate sector insights.");

    let pattern = engine.pattern_insight().await.unwrap();
    assert_eq!(pattern.content, "Unable to generate pattern insight.");

    let beginner = engine.beginner_explanation("P/E ratio").await;
    assert_eq!(beginner.explanation, "Unable to generate explanation.");
}

#[tokio::test]
async fn market_explanation_uses_summary() {
    let llm = ScriptedProvider::replying("Markets were mixed today.");
    let market = market();
    let engine = AdviceEngine::new(llm.clone(), market.clone());

    let summary = market.market_summary().await.unwrap();
    let explanation = engine.market_explanation().await.unwrap();

    assert_eq!(explanation.headline, format!("Market Mood Today: {}", summary.mood));
    assert_eq!(explanation.summary, "Markets were mixed today.");
    assert_eq!(explanation.tone, Tone::from_mood(&summary.mood));
    assert!((explanation.index_change - summary.index.change_percent).abs() < 1e-9);
    assert_eq!(explanation.provider, "scripted");

    let prompt = llm.last_prompt();
    assert!(prompt.contains(&format!("- Market Mood: {}", summary.mood)));
    assert!(prompt.contains(&format!("- Top Gaining Sector: {}", summary.sectors[0].name)));
}

#[tokio::test]
async fn sector_prompt_lists_top_five() {
    let llm = ScriptedProvider::replying("IT led the gains.");
    let engine = AdviceEngine::new(llm.clone(), market());

    let insights = engine.sector_insights().await.unwrap();
    assert_eq!(insights.sectors.len(), 8);
    assert_eq!(insights.insight, "IT led the gains.");

    let prompt = llm.last_prompt();
    let listed = prompt.lines().filter(|l| l.starts_with("- ")).count();
    assert_eq!(listed, 5);
    let first = &insights.sectors[0];
    assert!(prompt.contains(&format!("- {}: {:+.1}%", first.name, first.change_percent)));
}

#[tokio::test]
async fn beginner_explanation_quotes_context() {
    let llm = ScriptedProvider::replying("It compares price to earnings.");
    let engine = AdviceEngine::new(llm.clone(), market());

    let explanation = engine.beginner_explanation("P/E ratio").await;
    assert_eq!(explanation.explanation, "It compares price to earnings.");
    assert_eq!(
        llm.last_prompt(),
        "Explain this for a beginner investor in India in simple terms (under 60 words):\n\"P/E ratio\""
    );
}

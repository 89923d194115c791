//! Advice Engine
//!
//! Builds prompts from scores and market data, sends them to the configured
//! text-generation provider, and shapes the responses. Generation failures
//! never surface as errors; each card falls back to fixed text.

use std::sync::Arc;

use advisor_core::{Generation, GenerationOptions, LlmProvider};
use serde::{Deserialize, Serialize};

use super::parser::parse_personalized_advice;
use super::templates::{PromptParams, PromptTemplate};
use crate::error::Result;
use crate::market::{MarketDataService, SectorPerformance, Tone, Trend, Volatility};
use crate::model::{AdviceResult, MarketRiskLevel, ReadinessResult, RiskProfile};

const SECTORS_IN_PROMPT: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketExplanation {
    pub headline: String,
    pub summary: String,
    pub tone: Tone,
    pub index_change: f64,
    pub provider: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectorInsights {
    pub sectors: Vec<SectorPerformance>,
    pub insight: String,
    pub provider: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EducationCard {
    pub topic: String,
    pub content: String,
    pub provider: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternInsight {
    pub title: String,
    pub content: String,
    pub volatility: Volatility,
    pub trend: Trend,
    pub provider: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BeginnerExplanation {
    pub context: String,
    pub explanation: String,
    pub provider: String,
}

/// AI-backed advice over the scoring engine and market data
pub struct AdviceEngine {
    llm: Arc<dyn LlmProvider>,
    market: Arc<MarketDataService>,
    options: GenerationOptions,
}

impl AdviceEngine {
    pub fn new(llm: Arc<dyn LlmProvider>, market: Arc<MarketDataService>) -> Self {
        Self {
            llm,
            market,
            options: GenerationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn market(&self) -> &MarketDataService {
        &self.market
    }

    async fn generate(&self, kind: &str, prompt: &str) -> Generation {
        let generation = advisor_core::generate(self.llm.as_ref(), prompt, &self.options).await;
        tracing::debug!(
            kind,
            provider = %generation.provider,
            success = generation.success,
            latency_ms = generation.latency_ms,
            "Generated advice text"
        );
        generation
    }

    /// Plain-language summary of today's market
    pub async fn market_explanation(&self) -> Result<MarketExplanation> {
        let summary = self.market.market_summary().await?;
        let (top_name, top_change) = sector_or_na(summary.sectors.first());
        let (bottom_name, bottom_change) = sector_or_na(summary.sectors.last());

        let prompt = PromptTemplate::MarketExplanation.render(
            &PromptParams::new()
                .with("index_change", summary.index.change_percent)
                .with("top_sector", top_name)
                .with("top_sector_change", top_change)
                .with("bottom_sector", bottom_name)
                .with("bottom_sector_change", bottom_change)
                .with("mood", &summary.mood),
        )?;

        let generation = self.generate("market_explanation", &prompt).await;

        Ok(MarketExplanation {
            headline: format!("Market Mood Today: {}", summary.mood),
            summary: generation.text_or("Unable to generate market summary."),
            tone: Tone::from_mood(&summary.mood),
            index_change: summary.index.change_percent,
            provider: generation.provider_or_unknown(),
        })
    }

    /// Daily SIP / lump-sum / long-term / trader guidance for one user
    pub async fn personalized_advice(
        &self,
        readiness: &ReadinessResult,
        risk_profile: Option<&RiskProfile>,
        market_risk: MarketRiskLevel,
    ) -> Result<AdviceResult> {
        let prompt = PromptTemplate::PersonalizedAdvice.render(
            &PromptParams::new()
                .with("score", readiness.score)
                .with("status", readiness.status)
                .with("risk_level", risk_profile.map(|p| p.risk_level).unwrap_or_default())
                .with("ef_months", format!("{:.1}", readiness.breakdown.months_coverage()))
                .with("market_risk", market_risk),
        )?;

        let generation = self.generate("personalized_advice", &prompt).await;
        let text = if generation.success {
            generation.text.as_str()
        } else {
            ""
        };

        Ok(AdviceResult {
            provider: generation.provider_or_unknown(),
            ..parse_personalized_advice(text)
        })
    }

    /// Why the leading sectors moved today
    pub async fn sector_insights(&self) -> Result<SectorInsights> {
        let sectors = self.market.sector_performance().await?;
        let sector_data = sectors
            .iter()
            .take(SECTORS_IN_PROMPT)
            .map(|s| format!("- {}: {:+.1}%", s.name, s.change_percent))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = PromptTemplate::SectorInsight
            .render(&PromptParams::new().with("sector_data", sector_data))?;
        let generation = self.generate("sector_insight", &prompt).await;

        Ok(SectorInsights {
            sectors,
            insight: generation.text_or("Unable to generate sector insights."),
            provider: generation.provider_or_unknown(),
        })
    }

    /// Short beginner lesson on a topic
    pub async fn education_card(&self, topic: &str) -> Result<EducationCard> {
        let prompt = PromptTemplate::Education.render(&PromptParams::new().with("topic", topic))?;
        let generation = self.generate("education", &prompt).await;

        Ok(EducationCard {
            topic: title_case(topic),
            content: generation.text_or(&format!("Unable to explain {topic}.")),
            provider: generation.provider_or_unknown(),
        })
    }

    /// Today's market pattern in plain words
    pub async fn pattern_insight(&self) -> Result<PatternInsight> {
        let summary = self.market.market_summary().await?;
        let change = summary.index.change_percent;
        let (top_mover, top_mover_change) = summary
            .movers
            .gainers
            .first()
            .map_or(("N/A".to_string(), 0.0), |q| {
                (q.display_name().to_string(), q.change_percent)
            });

        let volatility = Volatility::from_change(change);
        let trend = Trend::from_change(change);

        let prompt = PromptTemplate::PatternInsight.render(
            &PromptParams::new()
                .with("trend", trend.as_str())
                .with("volatility", volatility.as_str())
                .with("top_mover", top_mover)
                .with("top_mover_change", top_mover_change),
        )?;
        let generation = self.generate("pattern_insight", &prompt).await;

        Ok(PatternInsight {
            title: "Today's Pattern Insight".into(),
            content: generation.text_or("Unable to generate pattern insight."),
            volatility,
            trend,
            provider: generation.provider_or_unknown(),
        })
    }

    /// Explain any snippet of text for a first-time investor
    pub async fn beginner_explanation(&self, context: &str) -> BeginnerExplanation {
        let prompt = format!(
            "Explain this for a beginner investor in India in simple terms (under 60 words):\n\"{context}\""
        );
        let generation = self.generate("beginner_explanation", &prompt).await;

        BeginnerExplanation {
            context: context.to_string(),
            explanation: generation.text_or("Unable to generate explanation."),
            provider: generation.provider_or_unknown(),
        }
    }
}

fn sector_or_na(sector: Option<&SectorPerformance>) -> (&str, f64) {
    sector.map_or(("N/A", 0.0), |s| (s.name.as_str(), s.change_percent))
}

/// Uppercase the first letter of every word, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    out
}

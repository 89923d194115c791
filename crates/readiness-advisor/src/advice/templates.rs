//! Prompt Templates
//!
//! Five named prompts with `{field}` placeholders. Rendering is plain
//! substitution; every placeholder must be supplied.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{AdvisorError, Result};

/// `{field}`; the literal is known to compile
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is a valid literal"));

const MARKET_EXPLANATION: &str = "\
Explain today's Indian stock market movement in simple language for a beginner investor.
Keep it under 120 words. Avoid jargon. Use simple Hindi-English mix if appropriate.
Mention 2-3 key drivers.

Market Data:
- NIFTY 50 Change: {index_change}%
- Top Gaining Sector: {top_sector} ({top_sector_change}%)
- Top Losing Sector: {bottom_sector} ({bottom_sector_change}%)
- Market Mood: {mood}

Respond in a friendly, educational tone.";

const PERSONALIZED_ADVICE: &str = "\
Based on this investor's readiness and market conditions, provide simple investment guidance.
Keep it practical and beginner-friendly.

Investor Profile:
- Readiness Score: {score}/100 ({status})
- Risk Profile: {risk_level}
- Emergency Fund: {ef_months} months coverage
- Market Risk: {market_risk}

Provide specific guidance for:
1. SIPs (Systematic Investment Plans)
2. Lump-sum investments
3. Long-term investors
4. Short-term traders

Keep each point to 1 short sentence. Be direct and actionable.";

const SECTOR_INSIGHT: &str = "\
Summarize why these sectors moved today in beginner-friendly language.
Keep it under 100 words total.

Sector Performance:
{sector_data}

Use simple explanations a first-time investor would understand.";

const EDUCATION: &str = "\
Explain \"{topic}\" in 4-5 bullet points for a complete beginner investor in India.
Avoid technical jargon. Use simple examples where helpful.
Keep the total response under 100 words.";

const PATTERN_INSIGHT: &str = "\
Describe a market pattern or insight for today based on this data:
- Overall Market Trend: {trend}
- Volatility Level: {volatility}
- Top Mover: {top_mover} ({top_mover_change}%)

Keep it educational and under 80 words. Explain what it means for a beginner investor.";

/// Named prompt templates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptTemplate {
    MarketExplanation,
    PersonalizedAdvice,
    SectorInsight,
    Education,
    PatternInsight,
}

impl PromptTemplate {
    pub const ALL: [Self; 5] = [
        Self::MarketExplanation,
        Self::PersonalizedAdvice,
        Self::SectorInsight,
        Self::Education,
        Self::PatternInsight,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::MarketExplanation => "market_explanation",
            Self::PersonalizedAdvice => "personalized_advice",
            Self::SectorInsight => "sector_insight",
            Self::Education => "education",
            Self::PatternInsight => "pattern_insight",
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::MarketExplanation => MARKET_EXPLANATION,
            Self::PersonalizedAdvice => PERSONALIZED_ADVICE,
            Self::SectorInsight => SECTOR_INSIGHT,
            Self::Education => EDUCATION,
            Self::PatternInsight => PATTERN_INSIGHT,
        }
    }

    /// Placeholders the template requires
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::MarketExplanation => &[
                "index_change",
                "top_sector",
                "top_sector_change",
                "bottom_sector",
                "bottom_sector_change",
                "mood",
            ],
            Self::PersonalizedAdvice => &["score", "status", "risk_level", "ef_months", "market_risk"],
            Self::SectorInsight => &["sector_data"],
            Self::Education => &["topic"],
            Self::PatternInsight => &["trend", "volatility", "top_mover", "top_mover_change"],
        }
    }

    /// Substitute every placeholder; fails on the first missing field.
    pub fn render(self, params: &PromptParams) -> Result<String> {
        if let Some(missing) = self.fields().iter().find(|f| !params.contains(f)) {
            return Err(AdvisorError::MissingTemplateField {
                template: self.name().into(),
                field: (*missing).into(),
            });
        }

        let rendered = PLACEHOLDER.replace_all(self.text(), |caps: &Captures<'_>| {
            params.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PromptTemplate {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| AdvisorError::UnknownTemplate(s.to_string()))
    }
}

/// Values for template placeholders
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PromptParams(BTreeMap<String, String>);

impl PromptParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.0.insert(field.into(), value.to_string());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl fmt::Display) {
        self.0.insert(field.into(), value.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

/// Render a template by name
pub fn render_prompt(template_name: &str, params: &PromptParams) -> Result<String> {
    template_name.parse::<PromptTemplate>()?.render(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_placeholder_is_declared() {
        for template in PromptTemplate::ALL {
            let mut found: Vec<&str> = PLACEHOLDER
                .captures_iter(template.text())
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            found.sort_unstable();
            found.dedup();

            let mut declared = template.fields().to_vec();
            declared.sort_unstable();
            assert_eq!(found, declared, "{template}");
        }
    }

    #[test]
    fn test_render_education() {
        let prompt = render_prompt("education", &PromptParams::new().with("topic", "SIP")).unwrap();
        assert!(prompt.starts_with("Explain \"SIP\" in 4-5 bullet points"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_render_personalized_advice() {
        let params = PromptParams::new()
            .with("score", 75)
            .with("status", "ALMOST_READY")
            .with("risk_level", "MODERATE")
            .with("ef_months", format!("{:.1}", 2.571))
            .with("market_risk", "MEDIUM");

        let prompt = PromptTemplate::PersonalizedAdvice.render(&params).unwrap();
        assert!(prompt.contains("- Readiness Score: 75/100 (ALMOST_READY)"));
        assert!(prompt.contains("- Emergency Fund: 2.6 months coverage"));
        assert!(prompt.contains("1. SIPs (Systematic Investment Plans)"));
    }

    #[test]
    fn test_missing_field_is_error() {
        let params = PromptParams::new().with("trend", "Upward").with("volatility", "Low");
        let err = render_prompt("pattern_insight", &params).unwrap_err();
        match err {
            AdvisorError::MissingTemplateField { template, field } => {
                assert_eq!(template, "pattern_insight");
                assert_eq!(field, "top_mover");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_template() {
        assert!(matches!(
            render_prompt("horoscope", &PromptParams::new()),
            Err(AdvisorError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_extra_params_are_ignored() {
        let params = PromptParams::new()
            .with("sector_data", "- Banking: +0.8%")
            .with("unused", 1);
        let prompt = PromptTemplate::SectorInsight.render(&params).unwrap();
        assert!(prompt.contains("Sector Performance:\n- Banking: +0.8%\n"));
    }
}

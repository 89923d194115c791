//! Market Risk & Mood Classification
//!
//! Turns a numeric index change (%) into qualitative market state:
//!
//! ```text
//!   risk (|Δ|)            mood / sector weather (signed Δ)
//!   ─────────────         ─────────────────────────────────────────────
//!   > 2.0   HIGH          > 1.0   Bullish & Positive         Sunny
//!   > 1.0   MEDIUM        > 0.3   Calm & Slightly Positive   Partly Cloudy
//!   else    LOW           > -0.3  Stable & Neutral           Cloudy
//!                         > -1.0  Cautious & Slightly Neg.   Light Rain
//!                         else    Bearish & Negative         Stormy
//! ```
//!
//! All comparisons are strict, so a value sitting exactly on a boundary
//! belongs to the band below it. Non-finite input is treated as 0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MarketRiskThresholds;
use crate::model::MarketRiskLevel;

/// Risk level with its explanation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketRiskAssessment {
    pub risk_level: MarketRiskLevel,
    pub reason: String,
    pub index_change: f64,
    pub timestamp: DateTime<Utc>,
}

/// Maps index change to a risk level
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketRiskClassifier {
    thresholds: MarketRiskThresholds,
}

impl MarketRiskClassifier {
    pub const fn new(thresholds: MarketRiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn risk_level(&self, index_change: f64) -> MarketRiskLevel {
        let magnitude = sanitize(index_change).abs();
        if magnitude > self.thresholds.high {
            MarketRiskLevel::High
        } else if magnitude > self.thresholds.medium {
            MarketRiskLevel::Medium
        } else {
            MarketRiskLevel::Low
        }
    }

    pub fn classify(&self, index_change: f64) -> MarketRiskAssessment {
        let risk_level = self.risk_level(index_change);
        let reason = match risk_level {
            MarketRiskLevel::High => "High market volatility detected",
            MarketRiskLevel::Medium | MarketRiskLevel::Unknown => "Moderate market movement",
            MarketRiskLevel::Low => "Stable market conditions",
        };

        MarketRiskAssessment {
            risk_level,
            reason: reason.into(),
            index_change: sanitize(index_change),
            timestamp: Utc::now(),
        }
    }
}

/// Five-band narrative mood of the market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBand {
    Bullish,
    SlightlyPositive,
    Neutral,
    SlightlyNegative,
    Bearish,
}

impl MoodBand {
    pub fn from_change(change: f64) -> Self {
        let change = sanitize(change);
        if change > 1.0 {
            Self::Bullish
        } else if change > 0.3 {
            Self::SlightlyPositive
        } else if change > -0.3 {
            Self::Neutral
        } else if change > -1.0 {
            Self::SlightlyNegative
        } else {
            Self::Bearish
        }
    }

    /// Human-readable mood
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish & Positive",
            Self::SlightlyPositive => "Calm & Slightly Positive",
            Self::Neutral => "Stable & Neutral",
            Self::SlightlyNegative => "Cautious & Slightly Negative",
            Self::Bearish => "Bearish & Negative",
        }
    }

    /// Icon key used by the UI
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Bullish => "sunny",
            Self::SlightlyPositive => "partly_sunny",
            Self::Neutral => "cloudy",
            Self::SlightlyNegative => "rain",
            Self::Bearish => "storm",
        }
    }

    /// Sector weather label and outlook for the same band
    pub const fn weather(self) -> (&'static str, &'static str) {
        match self {
            Self::Bullish => ("Sunny", "Strong momentum"),
            Self::SlightlyPositive => ("Partly Cloudy", "Positive outlook"),
            Self::Neutral => ("Cloudy", "Stable conditions"),
            Self::SlightlyNegative => ("Light Rain", "Under pressure"),
            Self::Bearish => ("Stormy", "Significant headwinds"),
        }
    }
}

/// Headline tone of a market explanation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Case-sensitive match on the mood wording
    pub fn from_mood(mood: &str) -> Self {
        if mood.contains("Positive") || mood.contains("Bullish") {
            Self::Positive
        } else if mood.contains("Negative") || mood.contains("Bearish") {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl Volatility {
    pub fn from_change(change: f64) -> Self {
        let magnitude = sanitize(change).abs();
        if magnitude > 1.5 {
            Self::High
        } else if magnitude > 0.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Upward,
    Downward,
}

impl Trend {
    pub fn from_change(change: f64) -> Self {
        if sanitize(change) > 0.0 {
            Self::Upward
        } else {
            Self::Downward
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upward => "Upward",
            Self::Downward => "Downward",
        }
    }
}

fn sanitize(change: f64) -> f64 {
    if change.is_finite() { change } else { 0.0 }
}

//! Configuration
//!
//! Explicit settings handed to the engine, classifier and market service at
//! construction. Nothing in the scoring path reads the environment itself;
//! `Settings::from_env` is called once by the binary.

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Weight of each score component. Must sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub emergency_fund: f64,
    pub savings_rate: f64,
    pub debt_to_income: f64,
    pub market_risk: f64,
    pub risk_alignment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            emergency_fund: 0.40,
            savings_rate: 0.20,
            debt_to_income: 0.20,
            market_risk: 0.10,
            risk_alignment: 0.10,
        }
    }
}

impl ScoreWeights {
    const TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.emergency_fund
            + self.savings_rate
            + self.debt_to_income
            + self.market_risk
            + self.risk_alignment
    }

    /// Check every weight is in [0, 1] and the total is 1.0.
    ///
    /// The engine itself never calls this; overrides are checked where
    /// they are loaded.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("emergency_fund", self.emergency_fund),
            ("savings_rate", self.savings_rate),
            ("debt_to_income", self.debt_to_income),
            ("market_risk", self.market_risk),
            ("risk_alignment", self.risk_alignment),
        ];

        if let Some((name, value)) = named
            .iter()
            .find(|(_, w)| !w.is_finite() || *w < 0.0 || *w > 1.0)
        {
            return Err(AdvisorError::InvalidWeights(format!(
                "{name} = {value} is outside [0, 1]"
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > Self::TOLERANCE {
            return Err(AdvisorError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Scoring engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub weights: ScoreWeights,

    /// Months of expenses at which the emergency fund scores 100
    pub ideal_emergency_months: f64,

    /// Savings rate (%) at which savings scores 100
    pub ideal_savings_rate: f64,

    /// Debt-to-income ratio (%) still considered safe
    pub safe_debt_ratio: f64,

    /// Score at or above which the user is ready to invest
    pub ready_threshold: u8,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            ideal_emergency_months: 6.0,
            ideal_savings_rate: 30.0,
            safe_debt_ratio: 30.0,
            ready_threshold: 60,
        }
    }
}

impl ReadinessConfig {
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }
}

/// Absolute index-change bands for the risk classifier
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketRiskThresholds {
    /// |change| above this is HIGH
    pub high: f64,
    /// |change| above this is MEDIUM
    pub medium: f64,
}

impl Default for MarketRiskThresholds {
    fn default() -> Self {
        Self {
            high: 2.0,
            medium: 1.0,
        }
    }
}

/// Market data source settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketDataSettings {
    /// Query Alpha Vantage first, falling back to mock data
    pub use_real_data: bool,
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    /// Symbol used for the headline index
    pub index_symbol: String,
    pub timeout_secs: u64,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            use_real_data: false,
            alpha_vantage_api_key: "demo".into(),
            alpha_vantage_base_url: "https://www.alphavantage.co/query".into(),
            index_symbol: "NIFTY50".into(),
            timeout_secs: 10,
        }
    }
}

/// All domain settings, loaded together
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub readiness: ReadinessConfig,
    pub market_risk: MarketRiskThresholds,
    pub market_data: MarketDataSettings,
}

impl Settings {
    /// Load from environment variables.
    ///
    /// - `READINESS_WEIGHTS`: JSON object overriding any of the five weights
    /// - `USE_REAL_MARKET_DATA`: `true`/`1`/`yes` to query Alpha Vantage
    /// - `ALPHA_VANTAGE_API_KEY`, `MARKET_INDEX_SYMBOL`
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Some(raw) = env_var("READINESS_WEIGHTS") {
            let weights: ScoreWeights = serde_json::from_str(&raw)?;
            weights.validate()?;
            settings.readiness.weights = weights;
        }

        if let Some(raw) = env_var("USE_REAL_MARKET_DATA") {
            settings.market_data.use_real_data = parse_flag(&raw).ok_or_else(|| {
                AdvisorError::Config(format!("USE_REAL_MARKET_DATA must be a boolean, got '{raw}'"))
            })?;
        }
        if let Some(key) = env_var("ALPHA_VANTAGE_API_KEY") {
            settings.market_data.alpha_vantage_api_key = key;
        }
        if let Some(symbol) = env_var("MARKET_INDEX_SYMBOL") {
            settings.market_data.index_symbol = symbol;
        }

        Ok(settings)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoreWeights {
            emergency_fund: 0.5,
            ..ScoreWeights::default()
        };
        assert!(matches!(weights.validate(), Err(AdvisorError::InvalidWeights(_))));

        let negative = ScoreWeights {
            emergency_fund: 0.6,
            savings_rate: -0.2,
            debt_to_income: 0.4,
            ..ScoreWeights::default()
        };
        assert!(matches!(negative.validate(), Err(AdvisorError::InvalidWeights(_))));
    }

    #[test]
    fn test_partial_weight_override_keeps_defaults() {
        let weights: ScoreWeights =
            serde_json::from_str(r#"{"emergency_fund": 0.5, "savings_rate": 0.1}"#).unwrap();
        assert_eq!(weights.emergency_fund, 0.5);
        assert_eq!(weights.debt_to_income, 0.20);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_readiness_defaults() {
        let config = ReadinessConfig::default();
        assert_eq!(config.ideal_emergency_months, 6.0);
        assert_eq!(config.ready_threshold, 60);
        assert_eq!(MarketRiskThresholds::default().high, 2.0);
        assert_eq!(MarketDataSettings::default().alpha_vantage_api_key, "demo");
    }
}

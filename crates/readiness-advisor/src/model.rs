//! Domain Models
//!
//! Financial inputs, risk profiles and the readiness result.
//! Uses `rust_decimal` for all monetary values; derived ratios are `f64`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Currency the profile is denominated in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

/// Monthly financial snapshot of a user
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    #[serde(default)]
    pub current_savings: Decimal,
    #[serde(default)]
    pub emergency_fund: Decimal,
    #[serde(default)]
    pub has_debt: bool,
    /// Outstanding debt; `None` when unknown
    #[serde(default)]
    pub debt_amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
}

impl FinancialMetrics {
    pub fn new(monthly_income: Decimal, monthly_expenses: Decimal) -> Self {
        Self {
            monthly_income,
            monthly_expenses,
            ..Self::default()
        }
    }

    pub fn with_emergency_fund(mut self, amount: Decimal) -> Self {
        self.emergency_fund = amount;
        self
    }

    pub fn with_savings(mut self, amount: Decimal) -> Self {
        self.current_savings = amount;
        self
    }

    pub fn with_debt(mut self, amount: Decimal) -> Self {
        self.has_debt = true;
        self.debt_amount = Some(amount);
        self
    }

    /// Income minus expenses; negative when overspending
    pub fn monthly_surplus(&self) -> Decimal {
        self.monthly_income.saturating_sub(self.monthly_expenses)
    }

    /// Surplus as a percentage of income, 0 when there is no income.
    pub fn savings_rate(&self) -> f64 {
        if self.monthly_income <= Decimal::ZERO {
            return 0.0;
        }
        percent(self.monthly_surplus(), self.monthly_income)
    }

    /// Emergency fund expressed as months of expenses
    pub fn emergency_fund_months(&self) -> f64 {
        if self.monthly_expenses <= Decimal::ZERO {
            return 0.0;
        }
        ratio(self.emergency_fund, self.monthly_expenses).max(0.0)
    }

    /// Debt as a percentage of annual income
    pub fn debt_to_income_ratio(&self) -> f64 {
        let Some(debt) = self.debt_amount.filter(|d| !d.is_zero()) else {
            return 0.0;
        };
        if self.monthly_income <= Decimal::ZERO {
            return 0.0;
        }
        let annual_income = self.monthly_income.saturating_mul(Decimal::from(12));
        percent(debt, annual_income).max(0.0)
    }

    /// Debt counts only when flagged and a non-zero amount is recorded
    pub fn carries_debt(&self) -> bool {
        self.has_debt && self.debt_amount.is_some_and(|d| !d.is_zero())
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// `numerator / denominator` for a positive denominator. A quotient too
/// large for `Decimal` saturates to `f64::MAX` with the numerator's sign.
fn ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    numerator
        .checked_div(denominator)
        .map_or_else(|| saturated(numerator), to_f64)
}

/// Same as [`ratio`], scaled to a percentage
fn percent(numerator: Decimal, denominator: Decimal) -> f64 {
    numerator
        .checked_div(denominator)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .map_or_else(|| saturated(numerator), to_f64)
}

fn saturated(numerator: Decimal) -> f64 {
    if numerator.is_sign_negative() {
        f64::MIN
    } else {
        f64::MAX
    }
}

/// Stated appetite for investment risk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "CONSERVATIVE",
            Self::Moderate => "MODERATE",
            Self::Aggressive => "AGGRESSIVE",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CONSERVATIVE" => Ok(Self::Conservative),
            "MODERATE" => Ok(Self::Moderate),
            "AGGRESSIVE" => Ok(Self::Aggressive),
            other => Err(AdvisorError::Config(format!("Unknown risk level: {other}"))),
        }
    }
}

/// Result of the user's risk assessment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,

    #[serde(default = "default_horizon")]
    pub investment_horizon_years: u32,

    #[serde(default)]
    pub can_tolerate_30_percent_drop: bool,

    #[serde(default = "default_true")]
    pub prefers_stable_returns: bool,
}

const fn default_horizon() -> u32 {
    5
}

const fn default_true() -> bool {
    true
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self::new(RiskLevel::Moderate)
    }
}

impl RiskProfile {
    pub const fn new(risk_level: RiskLevel) -> Self {
        Self {
            risk_level,
            investment_horizon_years: default_horizon(),
            can_tolerate_30_percent_drop: false,
            prefers_stable_returns: true,
        }
    }
}

/// Coarse market volatility level.
///
/// Any unrecognised value deserialises to `Unknown`, which the engine scores
/// like a moderate market without a suggestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRiskLevel {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl MarketRiskLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MarketRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketRiskLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => Self::Unknown,
        })
    }
}

/// Component-specific measurement recorded next to a score
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentMetric {
    MonthsCoverage(f64),
    Rate(f64),
    Ratio(f64),
    Level(MarketRiskLevel),
    RiskLevel(RiskLevel),
}

/// One weighted factor of the readiness score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Rounded score in [0, 100]
    pub score: u8,
    pub weight: f64,
    /// Unrounded score multiplied by weight
    pub weighted_score: f64,
    #[serde(flatten)]
    pub metric: ComponentMetric,
}

/// Per-component scores, serialised as a name → component map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub emergency_fund: ScoreComponent,
    pub savings_rate: ScoreComponent,
    pub debt_to_income: ScoreComponent,
    pub market_risk: ScoreComponent,
    pub risk_alignment: ScoreComponent,
}

impl Breakdown {
    /// Components in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ScoreComponent)> {
        [
            ("emergency_fund", &self.emergency_fund),
            ("savings_rate", &self.savings_rate),
            ("debt_to_income", &self.debt_to_income),
            ("market_risk", &self.market_risk),
            ("risk_alignment", &self.risk_alignment),
        ]
        .into_iter()
    }

    /// Sum of weighted scores before clamping and rounding
    pub fn weighted_total(&self) -> f64 {
        self.iter().map(|(_, c)| c.weighted_score).sum()
    }

    /// Emergency fund coverage in months, 0 if not recorded
    pub fn months_coverage(&self) -> f64 {
        match self.emergency_fund.metric {
            ComponentMetric::MonthsCoverage(months) => months,
            _ => 0.0,
        }
    }
}

/// Readiness classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessStatus {
    NotReady,
    GettingThere,
    AlmostReady,
    Ready,
}

impl ReadinessStatus {
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Ready,
            60..=79 => Self::AlmostReady,
            40..=59 => Self::GettingThere,
            _ => Self::NotReady,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::GettingThere => "GETTING_THERE",
            Self::AlmostReady => "ALMOST_READY",
            Self::Ready => "READY",
        }
    }

    /// Friendly message shown with the score
    pub const fn message(self) -> &'static str {
        match self {
            Self::Ready => "You're in great shape! Your financial foundation is solid.",
            Self::AlmostReady => {
                "You're building solid ground. A little more consistency will boost your confidence."
            }
            Self::GettingThere => {
                "You're on the right path. Focus on building your savings and reducing debt."
            }
            Self::NotReady => "Let's work on strengthening your financial foundation first.",
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one scoring call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessResult {
    pub score: u8,
    pub status: ReadinessStatus,
    pub status_message: String,
    pub breakdown: Breakdown,
    /// At most three, in component order
    pub suggestions: Vec<String>,
    pub ready_to_invest: bool,
}

/// Structured daily advice parsed from generated text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub sips: String,
    pub lumpsum: String,
    pub long_term: String,
    pub traders: String,
    pub provider: String,
    pub raw_response: String,
}

impl Default for AdviceResult {
    fn default() -> Self {
        Self {
            sips: "Continue your SIPs as planned.".into(),
            lumpsum: "Consider market conditions before large investments.".into(),
            long_term: "Stay focused on your long-term goals.".into(),
            traders: "Exercise caution in current market conditions.".into(),
            provider: "unknown".into(),
            raw_response: String::new(),
        }
    }
}

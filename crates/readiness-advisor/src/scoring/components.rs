//! Component scoring rules
//!
//! Each rule returns an unrounded score in [0, 100] and an optional
//! suggestion. Ramps are continuous at every band boundary.

use crate::config::ReadinessConfig;
use crate::model::{FinancialMetrics, MarketRiskLevel, RiskLevel, RiskProfile};

/// Unrounded component score with its suggestion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    pub raw: f64,
    pub suggestion: Option<&'static str>,
}

impl Scored {
    const fn new(raw: f64, suggestion: Option<&'static str>) -> Self {
        Self { raw, suggestion }
    }

    const fn perfect() -> Self {
        Self::new(100.0, None)
    }

    /// Score clamped to [0, 100]
    pub fn clamped(&self) -> f64 {
        if self.raw.is_nan() {
            0.0
        } else {
            self.raw.clamp(0.0, 100.0)
        }
    }

    /// Clamped score rounded half-to-even
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded(&self) -> u8 {
        self.clamped().round_ties_even() as u8
    }
}

/// Months of expenses covered: 0→30 below one month, 30→60 up to three,
/// 60→100 up to the ideal.
pub fn emergency_fund(months: f64, config: &ReadinessConfig) -> Scored {
    if months >= config.ideal_emergency_months {
        Scored::perfect()
    } else if months >= 3.0 {
        Scored::new(
            60.0 + (months - 3.0) * 13.33,
            Some("Build your emergency fund to 6 months of expenses."),
        )
    } else if months >= 1.0 {
        Scored::new(
            30.0 + (months - 1.0) * 15.0,
            Some("Focus on building at least 3 months of emergency savings."),
        )
    } else {
        Scored::new(
            months * 30.0,
            Some("Start building an emergency fund - aim for 1 month of expenses first."),
        )
    }
}

/// Share of income saved each month
pub fn savings_rate(rate: f64, config: &ReadinessConfig) -> Scored {
    if rate >= config.ideal_savings_rate {
        Scored::perfect()
    } else if rate >= 20.0 {
        Scored::new(70.0 + (rate - 20.0) * 3.0, None)
    } else if rate >= 10.0 {
        Scored::new(
            40.0 + (rate - 10.0) * 3.0,
            Some("Try to increase your savings rate to at least 20%."),
        )
    } else if rate > 0.0 {
        Scored::new(
            rate * 4.0,
            Some("Focus on reducing expenses to save more each month."),
        )
    } else {
        Scored::new(
            0.0,
            Some("Your expenses exceed income. Create a budget to start saving."),
        )
    }
}

/// Debt burden relative to annual income. No debt is a perfect score.
pub fn debt_to_income(financial: &FinancialMetrics, config: &ReadinessConfig) -> Scored {
    if !financial.carries_debt() {
        return Scored::perfect();
    }

    let ratio = financial.debt_to_income_ratio();
    if ratio <= 10.0 {
        Scored::perfect()
    } else if ratio <= config.safe_debt_ratio {
        Scored::new(100.0 - (ratio - 10.0) * 2.5, None)
    } else if ratio <= 50.0 {
        Scored::new(
            50.0 - (ratio - 30.0) * 2.0,
            Some("Consider prioritizing debt repayment before heavy investing."),
        )
    } else {
        Scored::new(
            (10.0 - (ratio - 50.0) * 0.2).max(0.0),
            Some("High debt ratio. Focus on debt reduction first."),
        )
    }
}

/// Current market volatility
pub const fn market_risk(level: MarketRiskLevel) -> Scored {
    match level {
        MarketRiskLevel::Low => Scored::perfect(),
        MarketRiskLevel::Medium => Scored::new(
            70.0,
            Some("Market conditions are moderate. Consider SIP over lump-sum."),
        ),
        MarketRiskLevel::High => Scored::new(
            30.0,
            Some("High market volatility. Avoid large lump-sum investments."),
        ),
        MarketRiskLevel::Unknown => Scored::new(70.0, None),
    }
}

/// How well the stated risk appetite fits the safety margin
pub fn risk_alignment(profile: Option<&RiskProfile>, ef_months: f64, rate: f64) -> Scored {
    let Some(profile) = profile else {
        return Scored::new(
            50.0,
            Some("Complete your risk assessment for personalized guidance."),
        );
    };

    match profile.risk_level {
        RiskLevel::Conservative => {
            if ef_months >= 6.0 && rate >= 15.0 {
                Scored::perfect()
            } else if ef_months >= 3.0 {
                Scored::new(80.0, None)
            } else {
                Scored::new(
                    60.0,
                    Some("Build more safety net before conservative investing."),
                )
            }
        }
        RiskLevel::Moderate => {
            if ef_months >= 3.0 && rate >= 10.0 {
                Scored::perfect()
            } else if ef_months >= 1.0 {
                Scored::new(
                    70.0,
                    Some("Strengthen your emergency fund for moderate risk investing."),
                )
            } else {
                Scored::new(
                    50.0,
                    Some("Build emergency savings before moderate risk investing."),
                )
            }
        }
        RiskLevel::Aggressive => {
            if ef_months >= 6.0 && rate >= 20.0 {
                Scored::perfect()
            } else if ef_months >= 3.0 && rate >= 15.0 {
                Scored::new(
                    80.0,
                    Some("Aggressive investing needs stronger financial foundation."),
                )
            } else if ef_months >= 1.0 {
                Scored::new(
                    50.0,
                    Some("Build more safety cushion for aggressive investing."),
                )
            } else {
                Scored::new(
                    30.0,
                    Some("High-risk investing requires solid financial foundation first."),
                )
            }
        }
    }
}

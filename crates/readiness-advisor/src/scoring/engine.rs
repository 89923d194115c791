//! Readiness Scoring Engine
//!
//! Deterministic weighted model: five component scores, each in [0, 100],
//! are weighted and summed into a single 0-100 readiness score.
//!
//! The breakdown stores each component score rounded, but the total sums the
//! unrounded weighted scores, clamps, and rounds once (half-to-even).

use crate::config::{ReadinessConfig, ScoreWeights};
use crate::model::{
    Breakdown, ComponentMetric, FinancialMetrics, MarketRiskLevel, ReadinessResult,
    ReadinessStatus, RiskProfile, ScoreComponent,
};

use super::components::{self, Scored};

const MAX_SUGGESTIONS: usize = 3;

/// Computes readiness scores from financial and market inputs
#[derive(Clone, Debug, Default)]
pub struct ReadinessEngine {
    config: ReadinessConfig,
}

impl ReadinessEngine {
    pub const fn new(config: ReadinessConfig) -> Self {
        Self { config }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self::new(ReadinessConfig::with_weights(weights))
    }

    pub const fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// Score a user's readiness to start investing.
    ///
    /// Weights are used as given; callers that accept overrides should
    /// check them with [`ScoreWeights::validate`] first.
    pub fn calculate_score(
        &self,
        financial: &FinancialMetrics,
        risk_profile: Option<&RiskProfile>,
        market_risk: MarketRiskLevel,
    ) -> ReadinessResult {
        let weights = &self.config.weights;
        let months = financial.emergency_fund_months();
        let rate = financial.savings_rate();
        let ratio = financial.debt_to_income_ratio();

        let ef = components::emergency_fund(months, &self.config);
        let sr = components::savings_rate(rate, &self.config);
        let di = components::debt_to_income(financial, &self.config);
        let mr = components::market_risk(market_risk);
        let ra = components::risk_alignment(risk_profile, months, rate);

        let breakdown = Breakdown {
            emergency_fund: component(ef, weights.emergency_fund, ComponentMetric::MonthsCoverage(months)),
            savings_rate: component(sr, weights.savings_rate, ComponentMetric::Rate(rate)),
            debt_to_income: component(di, weights.debt_to_income, ComponentMetric::Ratio(ratio)),
            market_risk: component(mr, weights.market_risk, ComponentMetric::Level(market_risk)),
            risk_alignment: component(
                ra,
                weights.risk_alignment,
                ComponentMetric::RiskLevel(risk_profile.map(|p| p.risk_level).unwrap_or_default()),
            ),
        };

        for (name, c) in breakdown.iter() {
            tracing::debug!(component = name, score = c.score, weighted = c.weighted_score, "Component scored");
        }

        let suggestions: Vec<String> = [ef, sr, di, mr, ra]
            .iter()
            .filter_map(|s| s.suggestion)
            .take(MAX_SUGGESTIONS)
            .map(String::from)
            .collect();

        let score = Scored {
            raw: breakdown.weighted_total(),
            suggestion: None,
        }
        .rounded();
        let status = ReadinessStatus::from_score(score);

        tracing::info!(score, status = %status, market_risk = %market_risk, "Readiness calculated");

        ReadinessResult {
            score,
            status,
            status_message: status.message().into(),
            breakdown,
            suggestions,
            ready_to_invest: score >= self.config.ready_threshold,
        }
    }
}

fn component(scored: Scored, weight: f64, metric: ComponentMetric) -> ScoreComponent {
    ScoreComponent {
        score: scored.rounded(),
        weight,
        weighted_score: scored.clamped() * weight,
        metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn engine() -> ReadinessEngine {
        ReadinessEngine::default()
    }

    #[test]
    fn test_beginner_scenario() {
        let financial = FinancialMetrics::new(dec!(50000), dec!(35000)).with_emergency_fund(dec!(90000));
        let profile = RiskProfile::new(RiskLevel::Moderate);

        let result = engine().calculate_score(&financial, Some(&profile), MarketRiskLevel::Medium);

        assert_eq!(result.breakdown.emergency_fund.score, 54);
        assert!((result.breakdown.emergency_fund.weighted_score - 21.428_571).abs() < 1e-4);
        assert_eq!(result.breakdown.savings_rate.score, 100);
        assert_eq!(result.breakdown.debt_to_income.score, 100);
        assert_eq!(result.breakdown.market_risk.score, 70);
        assert_eq!(result.breakdown.risk_alignment.score, 70);
        assert_eq!(result.score, 75);
        assert_eq!(result.status, ReadinessStatus::AlmostReady);
        assert!(result.ready_to_invest);
        assert_eq!(
            result.suggestions,
            vec![
                "Focus on building at least 3 months of emergency savings.",
                "Market conditions are moderate. Consider SIP over lump-sum.",
                "Strengthen your emergency fund for moderate risk investing.",
            ]
        );
    }

    #[test]
    fn test_all_perfect_is_100() {
        let financial = FinancialMetrics::new(dec!(100000), dec!(50000)).with_emergency_fund(dec!(600000));
        let profile = RiskProfile::new(RiskLevel::Aggressive);

        let result = engine().calculate_score(&financial, Some(&profile), MarketRiskLevel::Low);

        assert_eq!(result.score, 100);
        assert_eq!(result.status, ReadinessStatus::Ready);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.status_message, ReadinessStatus::Ready.message());
    }

    #[test]
    fn test_ready_threshold_boundary() {
        let engine = ReadinessEngine::with_weights(ScoreWeights {
            emergency_fund: 1.0,
            savings_rate: 0.0,
            debt_to_income: 0.0,
            market_risk: 0.0,
            risk_alignment: 0.0,
        });

        // 44000 / 15000 = 2.933 months -> 59
        let below = FinancialMetrics::new(dec!(20000), dec!(15000)).with_emergency_fund(dec!(44000));
        let result = engine.calculate_score(&below, None, MarketRiskLevel::Low);
        assert_eq!(result.score, 59);
        assert!(!result.ready_to_invest);
        assert_eq!(result.status, ReadinessStatus::GettingThere);

        // exactly 3 months -> 60
        let at = FinancialMetrics::new(dec!(20000), dec!(15000)).with_emergency_fund(dec!(45000));
        let result = engine.calculate_score(&at, None, MarketRiskLevel::Low);
        assert_eq!(result.score, 60);
        assert!(result.ready_to_invest);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        let financial = FinancialMetrics::new(dec!(1000), dec!(90000))
            .with_emergency_fund(dec!(-5000))
            .with_debt(dec!(99999999));

        let result = engine().calculate_score(&financial, None, MarketRiskLevel::High);
        assert!(result.score <= 100);
        assert_eq!(result.status, ReadinessStatus::NotReady);
        assert!(!result.ready_to_invest);
        assert_eq!(result.suggestions.len(), 3);
        assert!(result.breakdown.iter().all(|(_, c)| c.score <= 100 && c.weighted_score >= 0.0));
    }

    #[test]
    fn test_decimal_extremes_do_not_panic() {
        let huge_income = FinancialMetrics::new(Decimal::MAX, dec!(1000)).with_debt(dec!(5000));
        let result = engine().calculate_score(&huge_income, None, MarketRiskLevel::Low);
        assert!(result.score <= 100);
        assert_eq!(result.breakdown.debt_to_income.score, 100);
        assert_eq!(result.breakdown.savings_rate.score, 100);

        let huge_fund = FinancialMetrics::new(dec!(1000), dec!(0.0000001)).with_emergency_fund(Decimal::MAX);
        let result = engine().calculate_score(&huge_fund, None, MarketRiskLevel::Low);
        assert_eq!(result.breakdown.emergency_fund.score, 100);
        assert!(result.score <= 100);

        let huge_debt = FinancialMetrics::new(dec!(0.0000001), Decimal::MAX).with_debt(Decimal::MAX);
        let result = engine().calculate_score(&huge_debt, None, MarketRiskLevel::High);
        assert_eq!(result.breakdown.debt_to_income.score, 0);
        assert_eq!(result.breakdown.savings_rate.score, 0);
        assert_eq!(result.status, ReadinessStatus::NotReady);
        assert!(serde_json::to_string(&result).is_ok());
    }

    #[test]
    fn test_suggestions_capped_in_component_order() {
        let financial = FinancialMetrics::new(dec!(10000), dec!(9500)).with_debt(dec!(60000));
        let result = engine().calculate_score(&financial, None, MarketRiskLevel::High);

        assert_eq!(result.suggestions.len(), 3);
        assert!(result.suggestions[0].starts_with("Start building an emergency fund"));
        assert_eq!(
            result.suggestions[1],
            "Focus on reducing expenses to save more each month."
        );
        assert_eq!(
            result.suggestions[2],
            "Consider prioritizing debt repayment before heavy investing."
        );
    }

    #[test]
    fn test_missing_profile_records_moderate() {
        let financial = FinancialMetrics::new(dec!(50000), dec!(30000));
        let result = engine().calculate_score(&financial, None, MarketRiskLevel::Unknown);

        assert_eq!(result.breakdown.risk_alignment.score, 50);
        assert_eq!(
            result.breakdown.risk_alignment.metric,
            ComponentMetric::RiskLevel(RiskLevel::Moderate)
        );
        assert_eq!(result.breakdown.market_risk.score, 70);
        assert_eq!(
            result.breakdown.market_risk.metric,
            ComponentMetric::Level(MarketRiskLevel::Unknown)
        );
    }

    #[test]
    fn test_result_serializes_breakdown_map() {
        let financial = FinancialMetrics::new(dec!(50000), dec!(35000)).with_emergency_fund(dec!(90000));
        let result = engine().calculate_score(&financial, None, MarketRiskLevel::Medium);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "ALMOST_READY");
        assert_eq!(json["breakdown"]["market_risk"]["level"], "MEDIUM");
        assert_eq!(json["breakdown"]["savings_rate"]["rate"], 30.0);
        assert_eq!(json["breakdown"]["risk_alignment"]["risk_level"], "MODERATE");
    }
}

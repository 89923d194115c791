//! Notification preview
//!
//! Alerts that would be sent for the latest snapshot and today's market.
//! Nothing is delivered.

use serde::{Deserialize, Serialize};

use crate::history::ReadinessSnapshot;
use crate::market::MarketRiskAssessment;
use crate::model::MarketRiskLevel;

const LOW_READINESS_SCORE: u8 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReadinessAlert,
    MarketAlert,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

pub fn preview_notifications(
    latest: Option<&ReadinessSnapshot>,
    market_risk: &MarketRiskAssessment,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    if let Some(snapshot) = latest.filter(|s| s.score < LOW_READINESS_SCORE) {
        notifications.push(Notification {
            kind: NotificationKind::ReadinessAlert,
            title: "Readiness Score Low".into(),
            message: format!(
                "Your readiness score is {}/100. Focus on building your emergency fund.",
                snapshot.score
            ),
        });
    }

    if market_risk.risk_level == MarketRiskLevel::High {
        notifications.push(Notification {
            kind: NotificationKind::MarketAlert,
            title: "High Market Volatility".into(),
            message: "Markets are volatile today. Consider avoiding large investments.".into(),
        });
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketRiskThresholds;
    use crate::market::MarketRiskClassifier;
    use crate::model::FinancialMetrics;
    use crate::scoring::ReadinessEngine;
    use rust_decimal_macros::dec;

    fn snapshot(score: u8) -> ReadinessSnapshot {
        let result = ReadinessEngine::default().calculate_score(
            &FinancialMetrics::new(dec!(50000), dec!(40000)),
            None,
            MarketRiskLevel::Low,
        );
        let mut snapshot = ReadinessSnapshot::new("user-1", &result, MarketRiskLevel::Low);
        snapshot.score = score;
        snapshot
    }

    fn assessment(change: f64) -> MarketRiskAssessment {
        MarketRiskClassifier::new(MarketRiskThresholds::default()).classify(change)
    }

    #[test]
    fn test_low_score_and_volatile_market() {
        let latest = snapshot(32);
        let notifications = preview_notifications(Some(&latest), &assessment(-2.4));

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].kind, NotificationKind::ReadinessAlert);
        assert_eq!(
            notifications[0].message,
            "Your readiness score is 32/100. Focus on building your emergency fund."
        );
        assert_eq!(notifications[1].title, "High Market Volatility");
    }

    #[test]
    fn test_quiet_day() {
        let latest = snapshot(40);
        assert!(preview_notifications(Some(&latest), &assessment(1.5)).is_empty());
        assert!(preview_notifications(None, &assessment(0.2)).is_empty());
    }

    #[test]
    fn test_serialized_type_field() {
        let notifications = preview_notifications(None, &assessment(3.0));
        let json = serde_json::to_value(&notifications).unwrap();
        assert_eq!(json[0]["type"], "market_alert");
    }
}

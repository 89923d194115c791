//! Market Data Service
//!
//! Wraps a primary provider with an optional fallback and derives the
//! market summary and risk level used by the scoring and advice layers.
//!
//! ```text
//!   ┌──────────────┐  error / empty  ┌──────────────┐
//!   │   primary    │ ───────────────▶│   fallback   │  (quote.fallback = true)
//!   │ AlphaVantage │                 │     Mock     │
//!   └──────────────┘                 └──────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AlphaVantageProvider, IndexQuote, MarketDataProvider, MarketRiskAssessment,
    MarketRiskClassifier, MockMarketDataProvider, MoodBand, SectorPerformance, StockQuote,
    TopMovers,
};
use crate::config::{MarketDataSettings, MarketRiskThresholds};
use crate::error::{AdvisorError, Result};

/// Index, sectors, movers and mood in one payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSummary {
    pub index: IndexQuote,
    /// Best first
    pub sectors: Vec<SectorPerformance>,
    pub movers: TopMovers,
    pub mood: String,
    pub mood_icon: String,
    pub timestamp: DateTime<Utc>,
}

pub struct MarketDataService {
    primary: Arc<dyn MarketDataProvider>,
    fallback: Option<Arc<dyn MarketDataProvider>>,
    classifier: MarketRiskClassifier,
    index_symbol: String,
}

impl MarketDataService {
    pub fn new(
        primary: Arc<dyn MarketDataProvider>,
        fallback: Option<Arc<dyn MarketDataProvider>>,
    ) -> Self {
        Self {
            primary,
            fallback,
            classifier: MarketRiskClassifier::default(),
            index_symbol: MarketDataSettings::default().index_symbol,
        }
    }

    /// Mock data only
    pub fn mock() -> Self {
        Self::new(Arc::new(MockMarketDataProvider::new()), None)
    }

    /// Alpha Vantage with mock fallback when real data is enabled,
    /// otherwise mock only.
    pub fn from_settings(settings: &MarketDataSettings, thresholds: MarketRiskThresholds) -> Result<Self> {
        let mock: Arc<dyn MarketDataProvider> = Arc::new(MockMarketDataProvider::new());
        let service = if settings.use_real_data {
            tracing::info!("Using Alpha Vantage market data with mock fallback");
            Self::new(Arc::new(AlphaVantageProvider::new(settings)?), Some(mock))
        } else {
            tracing::info!("Using mock market data");
            Self::new(mock, None)
        };

        Ok(service
            .with_thresholds(thresholds)
            .with_index_symbol(settings.index_symbol.clone()))
    }

    pub fn with_thresholds(mut self, thresholds: MarketRiskThresholds) -> Self {
        self.classifier = MarketRiskClassifier::new(thresholds);
        self
    }

    pub fn with_index_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.index_symbol = symbol.into();
        self
    }

    pub fn classifier(&self) -> &MarketRiskClassifier {
        &self.classifier
    }

    pub async fn stock_quote(&self, symbol: &str) -> Result<StockQuote> {
        match self.primary.stock_quote(symbol).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                let Some(fallback) = self.fallback_for(&e) else {
                    return Err(e);
                };
                tracing::warn!(provider = %self.primary.name(), symbol, error = %e, "Quote failed, using fallback");
                let mut quote = fallback.stock_quote(symbol).await?;
                quote.fallback = true;
                Ok(quote)
            }
        }
    }

    pub async fn index_quote(&self) -> Result<IndexQuote> {
        match self.primary.index_quote(&self.index_symbol).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                let Some(fallback) = self.fallback_for(&e) else {
                    return Err(e);
                };
                tracing::warn!(provider = %self.primary.name(), error = %e, "Index quote failed, using fallback");
                let mut quote = fallback.index_quote(&self.index_symbol).await?;
                quote.fallback = true;
                Ok(quote)
            }
        }
    }

    pub async fn sector_performance(&self) -> Result<Vec<SectorPerformance>> {
        let primary = self.primary.sector_performance().await;
        match (primary, &self.fallback) {
            (Ok(sectors), _) if !sectors.is_empty() => Ok(sectors),
            (Ok(sectors), None) => Ok(sectors),
            (Err(e), None) => Err(e),
            (result, Some(fallback)) => {
                if let Err(e) = &result {
                    tracing::warn!(provider = %self.primary.name(), error = %e, "Sector data failed, using fallback");
                }
                fallback.sector_performance().await
            }
        }
    }

    /// Biggest gainers and losers; empty when no provider tracks them
    pub async fn top_movers(&self, count: usize) -> TopMovers {
        if let Ok(movers) = self.primary.top_movers(count).await {
            return movers;
        }
        if let Some(fallback) = &self.fallback {
            if let Ok(movers) = fallback.top_movers(count).await {
                return movers;
            }
        }
        TopMovers::default()
    }

    /// Fetch index, sectors and movers concurrently
    pub async fn market_summary(&self) -> Result<MarketSummary> {
        let (index, sectors, movers) = futures::join!(
            self.index_quote(),
            self.sector_performance(),
            self.top_movers(3)
        );
        let index = index?;
        let sectors = sectors.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "No sector data for summary");
            Vec::new()
        });

        let mood = MoodBand::from_change(index.change_percent);
        Ok(MarketSummary {
            index,
            sectors,
            movers,
            mood: mood.label().into(),
            mood_icon: mood.icon().into(),
            timestamp: Utc::now(),
        })
    }

    /// Current market risk from the index change
    pub async fn market_risk(&self) -> Result<MarketRiskAssessment> {
        let index = self.index_quote().await?;
        let assessment = self.classifier.classify(index.change_percent);
        tracing::debug!(risk = %assessment.risk_level, change = assessment.index_change, "Market risk classified");
        Ok(assessment)
    }

    fn fallback_for(&self, error: &AdvisorError) -> Option<&Arc<dyn MarketDataProvider>> {
        self.fallback.as_ref().filter(|_| error.is_recoverable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketRiskLevel;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct DownProvider;

    #[async_trait]
    impl MarketDataProvider for DownProvider {
        async fn index_quote(&self, _symbol: &str) -> Result<IndexQuote> {
            Err(AdvisorError::MarketData("offline".into()))
        }

        async fn stock_quote(&self, symbol: &str) -> Result<StockQuote> {
            Err(AdvisorError::UnsupportedSymbol(symbol.into()))
        }

        async fn sector_performance(&self) -> Result<Vec<SectorPerformance>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn mock() -> Arc<dyn MarketDataProvider> {
        Arc::new(MockMarketDataProvider::for_date(
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_fallback_marks_quotes() {
        let service = MarketDataService::new(Arc::new(DownProvider), Some(mock()));

        let index = service.index_quote().await.unwrap();
        assert!(index.fallback);
        assert_eq!(index.source, "mock");

        let quote = service.stock_quote("ITC.NS").await.unwrap();
        assert!(quote.fallback);

        let sectors = service.sector_performance().await.unwrap();
        assert_eq!(sectors.len(), 8);

        let movers = service.top_movers(5).await;
        assert_eq!(movers.gainers.len(), 5);
    }

    #[tokio::test]
    async fn test_no_fallback_propagates_error() {
        let service = MarketDataService::new(Arc::new(DownProvider), None);
        assert!(service.index_quote().await.is_err());
        assert!(service.sector_performance().await.unwrap().is_empty());
        assert!(service.top_movers(3).await.gainers.is_empty());
    }

    #[tokio::test]
    async fn test_summary_mood_matches_index() {
        let service = MarketDataService::new(mock(), None);
        let summary = service.market_summary().await.unwrap();

        let band = MoodBand::from_change(summary.index.change_percent);
        assert_eq!(summary.mood, band.label());
        assert_eq!(summary.mood_icon, band.icon());
        assert_eq!(summary.movers.gainers.len(), 3);
        assert!(!summary.index.fallback);
    }

    #[tokio::test]
    async fn test_market_risk_uses_thresholds() {
        let service = MarketDataService::new(mock(), None).with_thresholds(MarketRiskThresholds {
            high: -1.0,
            medium: -2.0,
        });
        let risk = service.market_risk().await.unwrap();
        assert_eq!(risk.risk_level, MarketRiskLevel::High);
    }
}

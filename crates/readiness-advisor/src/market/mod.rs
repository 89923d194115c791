//! Market Data
//!
//! Provider abstraction for index, stock and sector data, plus the
//! classifier that turns index movement into risk and mood.

mod alpha_vantage;
pub mod classifier;
mod mock;
mod service;

pub use alpha_vantage::AlphaVantageProvider;
pub use classifier::{
    MarketRiskAssessment, MarketRiskClassifier, MoodBand, Tone, Trend, Volatility,
};
pub use mock::MockMarketDataProvider;
pub use service::{MarketDataService, MarketSummary};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Headline index level
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub value: Decimal,
    pub change: Decimal,
    pub change_percent: f64,
    pub previous_close: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    /// Served by the fallback provider
    #[serde(default)]
    pub fallback: bool,
}

/// Single stock quote
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: f64,
    pub previous_close: Decimal,
    pub volume: u64,
    /// Short explanation of the move, when known
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    #[serde(default)]
    pub fallback: bool,
}

impl StockQuote {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Daily sector move
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub name: String,
    pub change_percent: f64,
    pub weather: String,
    pub outlook: String,
    pub source: String,
}

impl SectorPerformance {
    pub fn new(name: impl Into<String>, change_percent: f64, source: impl Into<String>) -> Self {
        let (weather, outlook) = MoodBand::from_change(change_percent).weather();
        Self {
            name: name.into(),
            change_percent,
            weather: weather.into(),
            outlook: outlook.into(),
            source: source.into(),
        }
    }
}

/// Best and worst performing stocks
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopMovers {
    pub gainers: Vec<StockQuote>,
    pub losers: Vec<StockQuote>,
}

impl TopMovers {
    /// Split quotes into the `count` biggest gainers and losers.
    pub fn from_quotes(mut quotes: Vec<StockQuote>, count: usize) -> Self {
        quotes.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        let gainers = quotes.iter().take(count).cloned().collect();
        let losers = quotes.iter().rev().take(count).cloned().collect();
        Self { gainers, losers }
    }
}

/// Market data provider trait (Strategy pattern)
///
/// Implemented by the Alpha Vantage client and the offline mock.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current value of an index such as NIFTY50
    async fn index_quote(&self, symbol: &str) -> Result<IndexQuote>;

    /// Current quote for a single stock
    async fn stock_quote(&self, symbol: &str) -> Result<StockQuote>;

    /// Sector moves, best first
    async fn sector_performance(&self) -> Result<Vec<SectorPerformance>>;

    /// Biggest gainers and losers among tracked stocks
    async fn top_movers(&self, _count: usize) -> Result<TopMovers> {
        Err(AdvisorError::MarketData(format!(
            "{} does not track top movers",
            self.name()
        )))
    }

    /// Provider name
    fn name(&self) -> &str;
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

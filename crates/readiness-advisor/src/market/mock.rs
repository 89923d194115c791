//! Mock Market Data Provider
//!
//! For demos and testing. Generates realistic Indian market data that stays
//! stable for a whole day: every figure is drawn from an RNG seeded with the
//! date, so repeated calls on the same day agree with each other.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use super::{
    IndexQuote, MarketDataProvider, SectorPerformance, StockQuote, TopMovers, round2,
};
use crate::error::Result;

struct Stock {
    symbol: &'static str,
    name: &'static str,
    sector: &'static str,
    base_price: u32,
}

struct Sector {
    name: &'static str,
    base_change: f64,
    volatility: f64,
}

const STOCKS: [Stock; 10] = [
    Stock { symbol: "INFY.NS", name: "Infosys", sector: "IT Services", base_price: 1650 },
    Stock { symbol: "HDFCBANK.NS", name: "HDFC Bank", sector: "Banking", base_price: 1580 },
    Stock { symbol: "ITC.NS", name: "ITC", sector: "FMCG", base_price: 450 },
    Stock { symbol: "TCS.NS", name: "TCS", sector: "IT Services", base_price: 3800 },
    Stock { symbol: "RELIANCE.NS", name: "Reliance", sector: "Energy", base_price: 2500 },
    Stock { symbol: "ICICIBANK.NS", name: "ICICI Bank", sector: "Banking", base_price: 1050 },
    Stock { symbol: "HINDUNILVR.NS", name: "Hindustan Unilever", sector: "FMCG", base_price: 2350 },
    Stock { symbol: "WIPRO.NS", name: "Wipro", sector: "IT Services", base_price: 480 },
    Stock { symbol: "SBIN.NS", name: "SBI", sector: "Banking", base_price: 620 },
    Stock { symbol: "BHARTIARTL.NS", name: "Bharti Airtel", sector: "Telecom", base_price: 1200 },
];

const SECTORS: [Sector; 8] = [
    Sector { name: "IT Services", base_change: 1.2, volatility: 1.5 },
    Sector { name: "Banking", base_change: 0.8, volatility: 1.2 },
    Sector { name: "FMCG", base_change: -0.2, volatility: 0.8 },
    Sector { name: "Energy", base_change: 0.5, volatility: 1.8 },
    Sector { name: "Telecom", base_change: 0.3, volatility: 1.0 },
    Sector { name: "Pharma", base_change: 0.6, volatility: 1.3 },
    Sector { name: "Auto", base_change: 0.4, volatility: 1.4 },
    Sector { name: "Metal", base_change: -0.5, volatility: 2.0 },
];

const POSITIVE_REASONS: [&str; 7] = [
    "Strong quarterly earnings",
    "Positive management outlook",
    "Profit beat expectations",
    "New contract wins",
    "Sector tailwinds",
    "Favorable regulatory news",
    "Analyst upgrades",
];

const NEGATIVE_REASONS: [&str; 7] = [
    "Sector pressure",
    "Rising input costs",
    "Margin concerns",
    "Global headwinds",
    "Profit booking",
    "Currency fluctuation impact",
    "Below-estimate results",
];

const NEUTRAL_REASONS: [&str; 4] = [
    "Range-bound trading",
    "Consolidation phase",
    "Mixed signals",
    "Awaiting key results",
];

const INDEX_BASE: u32 = 22_500;

/// Mock provider with date-seeded Indian market data
pub struct MockMarketDataProvider {
    seed: u64,
    stock_changes: Vec<f64>,
    sector_changes: Vec<f64>,
}

impl Default for MockMarketDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketDataProvider {
    /// Data for today (UTC)
    pub fn new() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    /// Data for a fixed day
    pub fn for_date(date: NaiveDate) -> Self {
        let seed = u64::try_from(date.year()).unwrap_or_default() * 10_000
            + u64::from(date.month()) * 100
            + u64::from(date.day());
        let mut rng = StdRng::seed_from_u64(seed);

        let stock_changes = STOCKS
            .iter()
            .map(|stock| {
                let (base, volatility) = SECTORS
                    .iter()
                    .find(|s| s.name == stock.sector)
                    .map_or((0.0, 1.0), |s| (s.base_change, s.volatility));
                round2(base + rng.random_range(-volatility..=volatility))
            })
            .collect();

        let sector_changes = SECTORS
            .iter()
            .map(|sector| round2(sector.base_change + rng.random_range(-0.5..=0.5)))
            .collect();

        Self {
            seed,
            stock_changes,
            sector_changes,
        }
    }

    /// NIFTY change: mean of the sector changes
    pub fn index_change(&self) -> f64 {
        if self.sector_changes.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.sector_changes.len() as f64;
        round2(self.sector_changes.iter().sum::<f64>() / count)
    }

    /// Symbols with curated data
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        STOCKS.iter().map(|s| s.symbol)
    }

    fn rng_for(&self, key: &str) -> StdRng {
        StdRng::seed_from_u64(symbol_seed(self.seed, key))
    }

    fn known_quote(&self, index: usize, stock: &Stock) -> StockQuote {
        let mut rng = self.rng_for(stock.symbol);
        let change_percent = self.stock_changes.get(index).copied().unwrap_or_default();
        let base_price = Decimal::from(stock.base_price);
        let change = (base_price * decimal(change_percent) / Decimal::ONE_HUNDRED).round_dp(2);

        let reasons: &[&str] = if change_percent > 0.5 {
            &POSITIVE_REASONS
        } else if change_percent < -0.5 {
            &NEGATIVE_REASONS
        } else {
            &NEUTRAL_REASONS
        };

        StockQuote {
            symbol: stock.symbol.into(),
            name: Some(stock.name.into()),
            sector: Some(stock.sector.into()),
            price: base_price + change,
            change,
            change_percent,
            previous_close: base_price,
            volume: rng.random_range(1_000_000..=50_000_000),
            reason: reasons.choose(&mut rng).map(|r| (*r).to_string()),
            timestamp: Utc::now(),
            source: "mock".into(),
            fallback: false,
        }
    }

    fn generic_quote(&self, symbol: &str) -> StockQuote {
        let mut rng = self.rng_for(symbol);
        let change_percent = round2(rng.random_range(-3.0..=3.0));
        let price = decimal(round2(rng.random_range(100.0..=5000.0)));
        let previous_close = decimal(round2(rng.random_range(100.0..=5000.0)));

        StockQuote {
            symbol: symbol.into(),
            name: None,
            sector: None,
            price,
            change: decimal(change_percent),
            change_percent,
            previous_close,
            volume: rng.random_range(100_000..=10_000_000),
            reason: None,
            timestamp: Utc::now(),
            source: "mock".into(),
            fallback: false,
        }
    }
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn index_quote(&self, symbol: &str) -> Result<IndexQuote> {
        let change_percent = self.index_change();
        let base = Decimal::from(INDEX_BASE);
        let change = (base * decimal(change_percent) / Decimal::ONE_HUNDRED).round_dp(2);

        Ok(IndexQuote {
            symbol: symbol.into(),
            name: "NIFTY 50".into(),
            value: base + change,
            change,
            change_percent,
            previous_close: base,
            timestamp: Utc::now(),
            source: "mock".into(),
            fallback: false,
        })
    }

    async fn stock_quote(&self, symbol: &str) -> Result<StockQuote> {
        let quote = STOCKS
            .iter()
            .enumerate()
            .find(|(_, s)| s.symbol == symbol)
            .map_or_else(
                || self.generic_quote(symbol),
                |(index, stock)| self.known_quote(index, stock),
            );
        Ok(quote)
    }

    async fn sector_performance(&self) -> Result<Vec<SectorPerformance>> {
        let mut sectors: Vec<_> = SECTORS
            .iter()
            .zip(&self.sector_changes)
            .map(|(sector, &change)| SectorPerformance::new(sector.name, change, "mock"))
            .collect();
        sectors.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        Ok(sectors)
    }

    async fn top_movers(&self, count: usize) -> Result<TopMovers> {
        let quotes = STOCKS
            .iter()
            .enumerate()
            .map(|(index, stock)| self.known_quote(index, stock))
            .collect();
        Ok(TopMovers::from_quotes(quotes, count))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Fold a symbol's bytes into the day seed (FNV-1a step)
fn symbol_seed(day_seed: u64, symbol: &str) -> u64 {
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    symbol
        .bytes()
        .fold(day_seed, |acc, b| (acc ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MockMarketDataProvider {
        MockMarketDataProvider::for_date(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
    }

    #[test]
    fn test_symbol_seed_is_fixed() {
        assert_eq!(symbol_seed(20_240_614, "INFY.NS"), 8_082_324_374_773_737_361);
        assert_ne!(symbol_seed(20_240_614, "TCS.NS"), symbol_seed(20_240_614, "ITC.NS"));
        assert_eq!(symbol_seed(20_240_614, ""), 20_240_614);
    }

    #[tokio::test]
    async fn test_same_day_is_stable() {
        let a = provider();
        let b = provider();

        let qa = a.stock_quote("INFY.NS").await.unwrap();
        let qb = b.stock_quote("INFY.NS").await.unwrap();
        assert_eq!(qa.change_percent, qb.change_percent);
        assert_eq!(qa.reason, qb.reason);
        assert_eq!(qa.volume, qb.volume);
        assert_eq!(a.index_change(), b.index_change());
    }

    #[tokio::test]
    async fn test_known_stock_quote() {
        let quote = provider().stock_quote("TCS.NS").await.unwrap();
        assert_eq!(quote.name.as_deref(), Some("TCS"));
        assert_eq!(quote.sector.as_deref(), Some("IT Services"));
        assert_eq!(quote.previous_close, Decimal::from(3800));
        assert_eq!(quote.price, quote.previous_close + quote.change);
        // IT Services: 1.2 ± 1.5
        assert!((-0.3..=2.7).contains(&quote.change_percent));
        assert!(quote.reason.is_some());
    }

    #[tokio::test]
    async fn test_unknown_symbol_gets_generic_quote() {
        let quote = provider().stock_quote("ACME.NS").await.unwrap();
        assert!(quote.name.is_none());
        assert!((-3.0..=3.0).contains(&quote.change_percent));
        assert_eq!(quote.source, "mock");
    }

    #[tokio::test]
    async fn test_index_is_sector_mean() {
        let provider = provider();
        let sectors = provider.sector_performance().await.unwrap();
        let mean = sectors.iter().map(|s| s.change_percent).sum::<f64>() / 8.0;

        let index = provider.index_quote("NIFTY50").await.unwrap();
        assert_eq!(index.name, "NIFTY 50");
        assert!((index.change_percent - mean).abs() < 0.006);
        assert_eq!(index.previous_close, Decimal::from(22_500));
    }

    #[tokio::test]
    async fn test_sectors_sorted_best_first() {
        let sectors = provider().sector_performance().await.unwrap();
        assert_eq!(sectors.len(), 8);
        assert!(
            sectors
                .windows(2)
                .all(|w| w[0].change_percent >= w[1].change_percent)
        );
    }

    #[tokio::test]
    async fn test_top_movers() {
        let movers = provider().top_movers(3).await.unwrap();
        assert_eq!(movers.gainers.len(), 3);
        assert_eq!(movers.losers.len(), 3);
        assert!(movers.gainers[0].change_percent >= movers.losers[0].change_percent);
    }
}

//! Alpha Vantage Market Data Provider
//!
//! Real quotes via the `GLOBAL_QUOTE` and `SECTOR` query functions.
//! An empty or throttled response is reported as an error so the service
//! can fall back to mock data.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{IndexQuote, MarketDataProvider, SectorPerformance, StockQuote};
use crate::config::MarketDataSettings;
use crate::error::{AdvisorError, Result};

pub struct AlphaVantageProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: settings.alpha_vantage_api_key.clone(),
            base_url: settings.alpha_vantage_base_url.clone(),
        })
    }

    async fn query<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T> {
        let res = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = res.json().await?;
        if let Some(note) = body.get("Note").or_else(|| body.get("Information")) {
            return Err(AdvisorError::MarketData(format!(
                "Alpha Vantage throttled the request: {note}"
            )));
        }
        Ok(serde_json::from_value(body)?)
    }

    fn parse_quote(symbol: &str, response: GlobalQuoteResponse) -> Result<StockQuote> {
        let quote = response
            .global_quote
            .filter(|q| !q.price.is_empty())
            .ok_or_else(|| AdvisorError::UnsupportedSymbol(symbol.to_string()))?;

        Ok(StockQuote {
            symbol: symbol.into(),
            name: None,
            sector: None,
            price: parse_decimal(&quote.price),
            change: parse_decimal(&quote.change),
            change_percent: parse_percent(&quote.change_percent),
            previous_close: parse_decimal(&quote.previous_close),
            volume: quote.volume.trim().parse().unwrap_or_default(),
            reason: None,
            timestamp: Utc::now(),
            source: "alpha_vantage".into(),
            fallback: false,
        })
    }

    fn parse_sectors(response: SectorResponse) -> Result<Vec<SectorPerformance>> {
        let mut sectors: Vec<_> = response
            .realtime
            .unwrap_or_default()
            .into_iter()
            .map(|(name, change)| SectorPerformance::new(name, parse_percent(&change), "alpha_vantage"))
            .collect();

        if sectors.is_empty() {
            return Err(AdvisorError::MarketData(
                "Alpha Vantage returned no sector data".into(),
            ));
        }
        sectors.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        Ok(sectors)
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    async fn index_quote(&self, symbol: &str) -> Result<IndexQuote> {
        let quote = self.stock_quote(symbol).await?;
        Ok(IndexQuote {
            symbol: quote.symbol.clone(),
            name: quote.symbol,
            value: quote.price,
            change: quote.change,
            change_percent: quote.change_percent,
            previous_close: quote.previous_close,
            timestamp: quote.timestamp,
            source: quote.source,
            fallback: false,
        })
    }

    async fn stock_quote(&self, symbol: &str) -> Result<StockQuote> {
        let response: GlobalQuoteResponse = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        Self::parse_quote(symbol, response)
    }

    async fn sector_performance(&self) -> Result<Vec<SectorPerformance>> {
        let response: SectorResponse = self.query(&[("function", "SECTOR")]).await?;
        Self::parse_sectors(response)
    }

    fn name(&self) -> &str {
        "alpha_vantage"
    }
}

fn parse_decimal(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or_default()
}

fn parse_percent(raw: &str) -> f64 {
    raw.trim().trim_end_matches('%').parse().unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "08. previous close")]
    previous_close: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

#[derive(Debug, Deserialize)]
struct SectorResponse {
    #[serde(rename = "Rank A: Real-Time Performance")]
    realtime: Option<HashMap<String, String>>,
}

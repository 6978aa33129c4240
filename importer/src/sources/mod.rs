//! External data providers
//!
//! Both providers sit behind a trait so the pipeline can run against fakes.

pub mod binance;
pub mod coingecko;

pub use binance::BinanceClient;
pub use coingecko::CoinGeckoClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::{MarketAsset, Timeframe};

use crate::Result;

/// Ranking provider: the top assets by market capitalization.
#[async_trait]
pub trait MarketUniverseSource: Send + Sync {
    /// Returns at most `count` assets, highest market cap first.
    ///
    /// Fails with [`crate::ImportError::SourceUnavailable`] when the provider
    /// is unreachable or answers with a non-success status.
    async fn fetch_top_assets(&self, count: usize) -> Result<Vec<MarketAsset>>;
}

/// Exchange candle provider.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Returns up to `limit` of the most recent candles.
    ///
    /// Any provider failure yields an empty list; callers cannot tell "no
    /// data" from "request failed" and treat both the same way.
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe, limit: u32) -> Vec<RawCandle>;
}

/// A candle exactly as the exchange returns it:
/// `[open_time_ms, open, high, low, close, volume, ...trailer]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawCandle(pub Vec<Value>);

/// OHLCV values of one candle after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ohlcv {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawCandle {
    /// Coerces the leading six fields, or `None` if any is missing or not numeric.
    pub fn normalize(&self) -> Option<Ohlcv> {
        let open_time = self.0.first().and_then(as_millis).and_then(DateTime::from_timestamp_millis)?;

        Some(Ohlcv {
            open_time,
            open: self.price(1)?,
            high: self.price(2)?,
            low: self.price(3)?,
            close: self.price(4)?,
            volume: self.price(5)?,
        })
    }

    fn price(&self, index: usize) -> Option<f64> {
        self.0.get(index).and_then(as_f64).filter(|v| v.is_finite())
    }
}

fn as_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

//! Binance spot klines client.

use async_trait::async_trait;
use shared::Timeframe;
use std::time::Duration;
use tracing::warn;

use super::{CandleSource, RawCandle};
use crate::{ImportError, Result};

/// Upper bound Binance accepts for `limit` on `/api/v3/klines`.
const MAX_KLINES_LIMIT: u32 = 1000;

#[derive(Debug, Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("price-importer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ImportError::HttpClient)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe, limit: u32) -> Vec<RawCandle> {
        let url = format!("{}/api/v3/klines", self.base_url.trim_end_matches('/'));
        let limit = limit.clamp(1, MAX_KLINES_LIMIT);

        let response = match self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", timeframe.as_str())])
            .query(&[("limit", limit)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Kline request for {} {} failed: {}", symbol, timeframe, e);
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Kline request for {} {} answered {}", symbol, timeframe, status);
            return Vec::new();
        }

        match response.json::<Vec<RawCandle>>().await {
            Ok(candles) => candles,
            Err(e) => {
                warn!("Invalid kline response for {} {}: {}", symbol, timeframe, e);
                Vec::new()
            }
        }
    }
}

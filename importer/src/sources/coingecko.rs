//! CoinGecko market ranking client.

use async_trait::async_trait;
use serde::Deserialize;
use shared::MarketAsset;
use std::time::Duration;
use tracing::{debug, info};

use super::MarketUniverseSource;
use crate::{ImportError, Result};

/// Largest page `/coins/markets` serves.
const MAX_PER_PAGE: usize = 250;

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CoinMarket {
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<String>,
}

impl From<CoinMarket> for MarketAsset {
    fn from(coin: CoinMarket) -> Self {
        MarketAsset::new(coin.symbol, coin.name, coin.image.unwrap_or_default())
    }
}

impl CoinGeckoClient {
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
impl MarketUniverseSource for CoinGeckoClient {
    async fn fetch_top_assets(&self, count: usize) -> Result<Vec<MarketAsset>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let per_page = count.min(MAX_PER_PAGE);
        let url = format!("{}/coins/markets", self.base_url.trim_end_matches('/'));
        debug!("Fetching top {} assets from {}", per_page, url);

        let response = self
            .client
            .get(&url)
            .query(&[("vs_currency", "usd"), ("order", "market_cap_desc")])
            .query(&[("per_page", per_page), ("page", 1)])
            .send()
            .await
            .map_err(|e| ImportError::SourceUnavailable(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::SourceUnavailable(format!("{} answered {}", url, status)));
        }

        let coins: Vec<CoinMarket> = response
            .json()
            .await
            .map_err(|e| ImportError::SourceUnavailable(format!("invalid response from {}: {}", url, e)))?;

        let assets: Vec<MarketAsset> = coins.into_iter().take(per_page).map(MarketAsset::from).collect();
        info!("Fetched {} assets from market ranking", assets.len());
        Ok(assets)
    }
}

//! Run sequencing: universe -> registry -> candles -> commit.

use sea_orm::{DatabaseConnection, TransactionTrait};
use shared::{AssetListing, Config, MarketAsset, Timeframe};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::governor::RateGovernor;
use crate::services::candle_importer::CandleImporter;
use crate::services::registry::reconcile;
use crate::sources::{CandleSource, MarketUniverseSource};
use crate::Result;

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub top_n: usize,
    pub timeframes: Vec<Timeframe>,
    pub candle_limit: u32,
    pub rate_delay: Duration,
    pub quote_asset: String,
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_n: config.top_n,
            timeframes: config.timeframes.clone(),
            candle_limit: config.candle_limit,
            rate_delay: config.rate_delay,
            quote_asset: config.quote_asset.clone(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub assets_reconciled: usize,
    pub assets_failed: usize,
    pub pairs_attempted: usize,
    /// Pairs for which the exchange returned nothing
    pub pairs_empty: usize,
    pub pairs_failed: usize,
    pub candles_fetched: usize,
    pub candles_attempted: usize,
    pub candles_written: usize,
}

pub struct RunDriver {
    universe: Arc<dyn MarketUniverseSource>,
    candles: Arc<dyn CandleSource>,
    settings: RunSettings,
}

impl RunDriver {
    pub fn new(
        universe: Arc<dyn MarketUniverseSource>,
        candles: Arc<dyn CandleSource>,
        settings: RunSettings,
    ) -> Self {
        Self {
            universe,
            candles,
            settings,
        }
    }

    /// Executes one full import.
    ///
    /// Only a missing universe or a failure to open/commit the run
    /// transaction ends the run with an error. Per-asset and per-pair
    /// failures are logged and counted in the report. Nothing is written
    /// before the universe has been fetched.
    pub async fn run(&self, db: &DatabaseConnection) -> Result<RunReport> {
        let assets = self.universe.fetch_top_assets(self.settings.top_n).await?;
        let listings = unique_listings(assets, &self.settings.quote_asset);
        info!(
            "Importing {} assets x {} timeframes",
            listings.len(),
            self.settings.timeframes.len()
        );

        let txn = db.begin().await?;
        let mut report = RunReport::default();

        let reconciled = reconcile(&txn, &listings).await;
        report.assets_reconciled = reconciled.upserted;
        report.assets_failed = reconciled.failed.len();

        let mut importer = CandleImporter::new(
            self.candles.clone(),
            RateGovernor::new(self.settings.rate_delay),
            self.settings.candle_limit,
        );

        for listing in &listings {
            for &timeframe in &self.settings.timeframes {
                info!("Importing candles for {} - {}", listing.symbol, timeframe);
                report.pairs_attempted += 1;

                match importer.import_history(&txn, &listing.symbol, timeframe).await {
                    Ok(counts) => {
                        if counts.fetched == 0 {
                            report.pairs_empty += 1;
                        }
                        report.candles_fetched += counts.fetched;
                        report.candles_attempted += counts.attempted;
                        report.candles_written += counts.written;
                    }
                    Err(e) => {
                        error!("{}", e.display_chain());
                        report.pairs_failed += 1;
                    }
                }
            }
        }

        txn.commit().await?;

        if report.pairs_empty > 0 {
            warn!("{} symbol/timeframe pairs returned no candles", report.pairs_empty);
        }
        info!(
            assets = report.assets_reconciled,
            assets_failed = report.assets_failed,
            pairs = report.pairs_attempted,
            pairs_empty = report.pairs_empty,
            pairs_failed = report.pairs_failed,
            candles_written = report.candles_written,
            candles_skipped = report.candles_attempted.saturating_sub(report.candles_written),
            "Import completed"
        );
        Ok(report)
    }
}

/// Derives exchange symbols, keeping only the best ranked asset per symbol.
fn unique_listings(assets: Vec<MarketAsset>, quote_asset: &str) -> Vec<AssetListing> {
    let mut seen = HashSet::new();
    assets
        .into_iter()
        .map(|asset| asset.into_listing(quote_asset))
        .filter(|listing| seen.insert(listing.symbol.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_listings_keeps_first_ranked() {
        let assets = vec![
            MarketAsset::new("btc", "Bitcoin", "btc.png"),
            MarketAsset::new("eth", "Ethereum", "eth.png"),
            MarketAsset::new("BTC", "Bitcoin Wrapped Clone", "clone.png"),
        ];

        let listings = unique_listings(assets, "USDT");

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].symbol, "BTCUSDT");
        assert_eq!(listings[0].name, "Bitcoin");
        assert_eq!(listings[1].symbol, "ETHUSDT");
    }
}

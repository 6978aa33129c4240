use anyhow::Result;
use importer::sources::{BinanceClient, CoinGeckoClient};
use importer::{RunDriver, RunSettings};
use shared::{get_db_connection, Config};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        "Starting price history importer {} ({}@{}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_BRANCH").unwrap_or("unknown"),
        option_env!("GIT_HASH").unwrap_or("unknown"),
        option_env!("BUILD_TIME").unwrap_or("unknown"),
    );

    let config = Config::from_env()?;
    let universe = Arc::new(CoinGeckoClient::new(&config.coingecko_base_url, config.http_timeout)?);
    let candles = Arc::new(BinanceClient::new(&config.binance_base_url, config.http_timeout)?);
    let driver = RunDriver::new(universe, candles, RunSettings::from(&config));

    let db = get_db_connection(&config.database_url).await?;
    let outcome = driver.run(&db).await;
    if let Err(e) = db.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }

    let report = outcome.map_err(|e| anyhow::anyhow!(e.display_chain()))?;
    tracing::info!(
        "Import finished: {} candles written for {} assets",
        report.candles_written,
        report.assets_reconciled
    );
    Ok(())
}

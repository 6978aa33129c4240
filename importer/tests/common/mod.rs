//! Shared fixtures: in-memory database and fake providers.
#![allow(dead_code)]

use async_trait::async_trait;
use importer::{CandleSource, ImportError, MarketUniverseSource, RawCandle, RunSettings};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use shared::{MarketAsset, Timeframe};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Fresh in-memory SQLite database with both tables migrated.
pub async fn setup_db() -> DatabaseConnection {
    let db = connect_memory().await;
    Migrator::up(&db, None).await.unwrap();
    db
}

/// In-memory SQLite database without any tables.
pub async fn connect_memory() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // A second pooled connection would open a different, empty database
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opt).await.unwrap()
}

pub fn settings(timeframes: &[Timeframe]) -> RunSettings {
    RunSettings {
        top_n: 100,
        timeframes: timeframes.to_vec(),
        candle_limit: 200,
        rate_delay: Duration::ZERO,
        quote_asset: "USDT".to_string(),
    }
}

pub fn raw(value: Value) -> RawCandle {
    serde_json::from_value(value).unwrap()
}

pub fn btc_hourly_candles() -> Vec<RawCandle> {
    vec![
        raw(serde_json::json!([1700000000000i64, "100", "110", "90", "105", "50", 1700003599999i64, "5250"])),
        raw(serde_json::json!([1700003600000i64, "105", "108", "95", "106", "40", 1700007199999i64, "4240"])),
    ]
}

pub struct FakeUniverse {
    assets: Vec<MarketAsset>,
    available: bool,
}

impl FakeUniverse {
    pub fn new(assets: Vec<MarketAsset>) -> Self {
        Self {
            assets,
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            assets: Vec::new(),
            available: false,
        }
    }
}

#[async_trait]
impl MarketUniverseSource for FakeUniverse {
    async fn fetch_top_assets(&self, count: usize) -> importer::Result<Vec<MarketAsset>> {
        if !self.available {
            return Err(ImportError::SourceUnavailable("503 Service Unavailable".to_string()));
        }
        Ok(self.assets.iter().take(count).cloned().collect())
    }
}

/// Answers from a fixed table and records every request in order.
#[derive(Default)]
pub struct FakeCandles {
    responses: HashMap<(String, Timeframe), Vec<RawCandle>>,
    calls: Mutex<Vec<(String, Timeframe, u32)>>,
    latency: Duration,
}

impl FakeCandles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, timeframe: Timeframe, candles: Vec<RawCandle>) -> Self {
        self.responses.insert((symbol.to_string(), timeframe), candles);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<(String, Timeframe, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CandleSource for FakeCandles {
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe, limit: u32) -> Vec<RawCandle> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), timeframe, limit));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.responses
            .get(&(symbol.to_string(), timeframe))
            .cloned()
            .unwrap_or_default()
    }
}

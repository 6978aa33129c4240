//! Candle history importer
//!
//! Fetches the most recent candles for one symbol/timeframe pair through the
//! rate governor and stores them insert-or-ignore on
//! `(symbol, timeframe, timestamp)`. Stored candles are never updated.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, EntityTrait, TransactionTrait};
use shared::entity::price_history;
use shared::Timeframe;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::governor::RateGovernor;
use crate::sources::{CandleSource, Ohlcv};
use crate::{ImportError, Result};

/// Outcome of importing one symbol/timeframe pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    /// Raw candles the provider returned
    pub fetched: usize,
    /// Candles that normalized and were submitted for insert
    pub attempted: usize,
    /// Rows actually inserted; `attempted - written` were already stored
    pub written: usize,
}

impl ImportCounts {
    pub fn duplicates(&self) -> usize {
        self.attempted.saturating_sub(self.written)
    }

    pub fn rejected(&self) -> usize {
        self.fetched.saturating_sub(self.attempted)
    }
}

pub struct CandleImporter {
    source: Arc<dyn CandleSource>,
    governor: RateGovernor,
    limit: u32,
}

impl CandleImporter {
    pub fn new(source: Arc<dyn CandleSource>, governor: RateGovernor, limit: u32) -> Self {
        Self {
            source,
            governor,
            limit,
        }
    }

    /// Imports the latest candles for `symbol` at `timeframe`.
    ///
    /// An empty provider answer is not an error and yields zero counts. The
    /// writes for the pair run in a savepoint; a storage failure rolls back
    /// just this pair.
    pub async fn import_history<C>(&mut self, db: &C, symbol: &str, timeframe: Timeframe) -> Result<ImportCounts>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        self.governor.acquire().await;
        let raw = self.source.fetch_candles(symbol, timeframe, self.limit).await;
        self.governor.release();

        let mut counts = ImportCounts {
            fetched: raw.len(),
            ..Default::default()
        };
        if raw.is_empty() {
            debug!("No candles for {} {}", symbol, timeframe);
            return Ok(counts);
        }

        let rows: Vec<price_history::ActiveModel> = raw
            .iter()
            .filter_map(|candle| candle.normalize())
            .map(|ohlcv| to_active_model(symbol, timeframe, ohlcv))
            .collect();
        counts.attempted = rows.len();
        if counts.rejected() > 0 {
            warn!("Rejected {} malformed candles for {} {}", counts.rejected(), symbol, timeframe);
        }
        if rows.is_empty() {
            return Ok(counts);
        }

        counts.written = self
            .write_rows(db, rows)
            .await
            .map_err(|source| ImportError::CandleWriteFailure {
                symbol: symbol.to_string(),
                timeframe,
                source,
            })? as usize;

        debug!(
            "{} {}: fetched {}, written {}, already stored {}",
            symbol,
            timeframe,
            counts.fetched,
            counts.written,
            counts.duplicates()
        );
        Ok(counts)
    }

    async fn write_rows<C>(&self, db: &C, rows: Vec<price_history::ActiveModel>) -> std::result::Result<u64, DbErr>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let savepoint = db.begin().await?;
        let result = price_history::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    price_history::Column::Symbol,
                    price_history::Column::Timeframe,
                    price_history::Column::Timestamp,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&savepoint)
            .await;

        match result {
            Ok(inserted) => {
                savepoint.commit().await?;
                Ok(inserted)
            }
            Err(e) => {
                savepoint.rollback().await.ok();
                Err(e)
            }
        }
    }
}

fn to_active_model(symbol: &str, timeframe: Timeframe, ohlcv: Ohlcv) -> price_history::ActiveModel {
    price_history::ActiveModel {
        symbol: ActiveValue::Set(symbol.to_string()),
        timeframe: ActiveValue::Set(timeframe.as_str().to_string()),
        open_price: ActiveValue::Set(ohlcv.open),
        high_price: ActiveValue::Set(ohlcv.high),
        low_price: ActiveValue::Set(ohlcv.low),
        close_price: ActiveValue::Set(ohlcv.close),
        volume: ActiveValue::Set(ohlcv.volume),
        timestamp: ActiveValue::Set(ohlcv.open_time),
        // Mirrors the candle open time rather than the insert wall time
        created_at: ActiveValue::Set(Some(ohlcv.open_time)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_counts() {
        let counts = ImportCounts {
            fetched: 10,
            attempted: 8,
            written: 3,
        };
        assert_eq!(counts.rejected(), 2);
        assert_eq!(counts.duplicates(), 5);
    }

    #[test]
    fn test_active_model_copies_open_time_into_created_at() {
        let open_time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let model = to_active_model(
            "BTCUSDT",
            Timeframe::OneHour,
            Ohlcv {
                open_time,
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 105.0,
                volume: 50.0,
            },
        );

        assert_eq!(model.symbol, ActiveValue::Set("BTCUSDT".to_string()));
        assert_eq!(model.timeframe, ActiveValue::Set("1h".to_string()));
        assert_eq!(model.timestamp, ActiveValue::Set(open_time));
        assert_eq!(model.created_at, ActiveValue::Set(Some(open_time)));
        assert_eq!(model.id, ActiveValue::NotSet);
    }
}

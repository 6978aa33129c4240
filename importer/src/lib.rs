//! Price-history importer
//!
//! Pulls the top market-cap assets from a ranking provider, registers them,
//! then fetches candle history for every asset and timeframe from an
//! exchange and stores it without duplicates.
//!
//! - [`sources`]: ranking and candle provider clients behind traits
//! - [`governor`]: fixed pacing between candle requests
//! - [`services`]: asset registry writer and candle importer
//! - [`driver`]: sequencing of a whole run

pub mod driver;
pub mod error;
pub mod governor;
pub mod services;
pub mod sources;

pub use driver::{RunDriver, RunReport, RunSettings};
pub use error::ImportError;
pub use governor::RateGovernor;
pub use services::candle_importer::{CandleImporter, ImportCounts};
pub use services::registry::{reconcile, ReconcileReport};
pub use sources::{CandleSource, MarketUniverseSource, RawCandle};

pub type Result<T> = std::result::Result<T, ImportError>;

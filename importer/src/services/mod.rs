pub mod candle_importer;
pub mod registry;

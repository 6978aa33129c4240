use sea_orm::DbErr;
use shared::Timeframe;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The ranking provider could not produce a universe. Fatal for a run.
    #[error("market universe source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("failed to write registry entry for {symbol}")]
    RegistryWriteFailure {
        symbol: String,
        #[source]
        source: DbErr,
    },

    #[error("failed to write {timeframe} candles for {symbol}")]
    CandleWriteFailure {
        symbol: String,
        timeframe: Timeframe,
        #[source]
        source: DbErr,
    },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ImportError {
    /// The error followed by its underlying causes, `": "` separated.
    pub fn display_chain(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(e) = cause {
            message.push_str(": ");
            message.push_str(&e.to_string());
            cause = std::error::Error::source(e);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_chain_includes_source() {
        let err = ImportError::RegistryWriteFailure {
            symbol: "BTCUSDT".to_string(),
            source: DbErr::Custom("constraint violated".to_string()),
        };
        let chain = err.display_chain();
        assert!(chain.starts_with("failed to write registry entry for BTCUSDT: "));
        assert!(chain.contains("constraint violated"));
    }

    #[test]
    fn test_display_chain_without_source() {
        let err = ImportError::SourceUnavailable("503 Service Unavailable".to_string());
        assert_eq!(err.display_chain(), "market universe source unavailable: 503 Service Unavailable");
    }
}

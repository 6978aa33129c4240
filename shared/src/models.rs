use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Market classification written for every asset this importer registers.
pub const SPOT_MARKET: &str = "Spot";

/// Quote currency appended to ranking-provider tickers.
pub const DEFAULT_QUOTE_ASSET: &str = "USDT";

/// Candle interval, named the way the exchange names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    FourHours,
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported timeframe: {0:?}")]
pub struct ParseTimeframeError(pub String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s.trim())
            .ok_or_else(|| ParseTimeframeError(s.to_string()))
    }
}

/// One entry of the market-cap ranking, as the ranking provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketAsset {
    /// Base ticker, e.g. "btc"
    pub ticker: String,
    pub display_name: String,
    /// Empty when the provider has no image
    pub image_reference: String,
}

impl MarketAsset {
    pub fn new(ticker: impl Into<String>, display_name: impl Into<String>, image_reference: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            display_name: display_name.into(),
            image_reference: image_reference.into(),
        }
    }

    /// Exchange trading symbol: uppercased ticker followed by the quote asset.
    pub fn trading_symbol(&self, quote_asset: &str) -> String {
        format!("{}{}", self.ticker.trim().to_uppercase(), quote_asset.to_uppercase())
    }

    pub fn into_listing(self, quote_asset: &str) -> AssetListing {
        AssetListing {
            symbol: self.trading_symbol(quote_asset),
            name: self.display_name,
            image_url: self.image_reference,
        }
    }
}

/// A ranked asset keyed by its exchange symbol, ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetListing {
    pub symbol: String,
    pub name: String,
    pub image_url: String,
}

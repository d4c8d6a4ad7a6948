//! Subscription descriptors consumed by record parsing and source resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Resolution;

/// Where a subscription's data comes from.
///
/// The feed kind selects source resolution and timestamp reconciliation. It
/// never changes indicator math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Historical replay from archived files
    #[default]
    Backtest,
    /// Live streaming endpoint
    LiveTrading,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Backtest => write!(f, "backtest"),
            FeedKind::LiveTrading => write!(f, "live_trading"),
        }
    }
}

impl FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backtest" | "replay" | "historical" => Ok(FeedKind::Backtest),
            "live_trading" | "live" => Ok(FeedKind::LiveTrading),
            _ => Err(format!("Invalid feed kind: {}", s)),
        }
    }
}

/// Which record variant a subscription's lines decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// OHLCV trade bars
    #[default]
    TradeBar,
    /// Top-of-book quotes
    Quote,
    /// Bare data points, which have no source format of their own
    Point,
}

impl RecordKind {
    /// File and endpoint suffix for this record kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            RecordKind::TradeBar => "trade",
            RecordKind::Quote => "quote",
            RecordKind::Point => "point",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::TradeBar => write!(f, "trade_bar"),
            RecordKind::Quote => write!(f, "quote"),
            RecordKind::Point => write!(f, "point"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trade_bar" | "trade" | "bar" => Ok(RecordKind::TradeBar),
            "quote" => Ok(RecordKind::Quote),
            "point" | "data_point" => Ok(RecordKind::Point),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

/// Immutable description of what is being subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Instrument symbol
    pub symbol: String,
    /// Sampling granularity
    pub resolution: Resolution,
    /// Record variant the source lines decode into
    #[serde(default)]
    pub record_kind: RecordKind,
    /// Root directory of the historical archive
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Base URL of the live streaming endpoint
    #[serde(default = "default_stream_endpoint")]
    pub stream_endpoint: String,
}

fn default_source_root() -> String {
    "data".to_string()
}

fn default_stream_endpoint() -> String {
    "wss://localhost:8765/v1".to_string()
}

impl SubscriptionConfig {
    /// Create a trade bar subscription with default source locations.
    pub fn new(symbol: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            symbol: symbol.into(),
            resolution,
            record_kind: RecordKind::default(),
            source_root: default_source_root(),
            stream_endpoint: default_stream_endpoint(),
        }
    }

    /// Set the record kind.
    pub fn with_record_kind(mut self, record_kind: RecordKind) -> Self {
        self.record_kind = record_kind;
        self
    }

    /// Set the historical archive root.
    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = root.into();
        self
    }

    /// Set the live streaming endpoint.
    pub fn with_stream_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.stream_endpoint = endpoint.into();
        self
    }
}

/// Opaque location (path or URL) a transport opens to obtain raw lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocator(String);

impl SourceLocator {
    /// Wrap a location string.
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// The location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the location is a URL rather than a filesystem path.
    pub fn is_url(&self) -> bool {
        self.0.contains("://")
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SourceLocator {
    fn from(location: String) -> Self {
        Self(location)
    }
}

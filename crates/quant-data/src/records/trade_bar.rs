//! OHLCV trade bars.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use quant_core::error::ParseError;
use quant_core::traits::DataRecord;
use quant_core::types::{DataPoint, FeedKind, SourceLocator, SubscriptionConfig};

use super::locate;
use crate::fields::Fields;

/// One OHLCV bar for a symbol.
///
/// Line format: `time,open,high,low,close,volume`. The bar's data point is
/// its close. Identity is the symbol plus that point, so two bars closing at
/// the same price and instant are equal even if their volumes differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeBar {
    /// Instrument symbol
    pub symbol: String,
    /// Bar time
    pub time: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl TradeBar {
    /// Create a new bar.
    pub fn new(
        symbol: impl Into<String>,
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

impl PartialEq for TradeBar {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.data_point() == other.data_point()
    }
}

impl Eq for TradeBar {}

impl Hash for TradeBar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.data_point().hash(state);
    }
}

impl DataRecord for TradeBar {
    const KIND: &'static str = "trade_bar";

    fn data_point(&self) -> DataPoint {
        DataPoint::new(self.time, self.close)
    }

    fn parse(
        config: &SubscriptionConfig,
        line: &str,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<Self, ParseError> {
        let fields = Fields::split(Self::KIND, line, 6)?;
        let time = fields.time(0, config.resolution, as_of, feed)?;

        Ok(Self {
            symbol: config.symbol.clone(),
            time,
            open: fields.non_negative(1, "open")?,
            high: fields.non_negative(2, "high")?,
            low: fields.non_negative(3, "low")?,
            close: fields.non_negative(4, "close")?,
            volume: fields.non_negative(5, "volume")?,
        })
    }

    fn resolve_source(
        config: &SubscriptionConfig,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<SourceLocator, ParseError> {
        Ok(locate(config, as_of, feed, "trade"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_core::types::Resolution;
    use std::collections::HashSet;

    fn config() -> SubscriptionConfig {
        SubscriptionConfig::new("SPY", Resolution::Minute).with_source_root("/archive")
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_parse_backtest_line() {
        let bar = TradeBar::parse(
            &config(),
            "34200000,470.1,471.0,469.8,470.5,120000",
            as_of(),
            FeedKind::Backtest,
        )
        .unwrap();

        assert_eq!(bar.symbol, "SPY");
        assert_eq!(bar.time, as_of().and_hms_opt(9, 30, 0).unwrap().and_utc());
        assert!((bar.range() - 1.2).abs() < 1e-9);
        assert!(bar.is_bullish());
        assert_eq!(bar.data_point().value, 470.5);
    }

    #[test]
    fn test_parse_live_line() {
        let bar = TradeBar::parse(
            &config(),
            "1705312800000,1,2,0.5,1.5,10",
            as_of(),
            FeedKind::LiveTrading,
        )
        .unwrap();
        assert_eq!(bar.time.timestamp_millis(), 1_705_312_800_000);
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        let parse = |line: &str| TradeBar::parse(&config(), line, as_of(), FeedKind::Backtest);

        assert!(matches!(parse("1,2,3"), Err(ParseError::Malformed { .. })));
        assert!(matches!(parse("x,1,1,1,1,1"), Err(ParseError::Malformed { .. })));
        assert_eq!(
            parse("0,1,1,1,1,-5"),
            Err(ParseError::OutOfRange {
                kind: "trade_bar",
                field: "volume",
                value: -5.0,
            })
        );
        assert!(matches!(
            parse("0,1,inf,1,1,1"),
            Err(ParseError::OutOfRange { field: "high", .. })
        ));
    }

    #[test]
    fn test_identity_is_symbol_and_point() {
        let time = as_of().and_hms_opt(10, 0, 0).unwrap().and_utc();
        let a = TradeBar::new("SPY", time, 1.0, 2.0, 0.5, 1.5, 100.0);
        let b = TradeBar::new("SPY", time, 1.1, 2.1, 0.4, 1.5, 900.0);
        let c = TradeBar::new("QQQ", time, 1.0, 2.0, 0.5, 1.5, 100.0);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<TradeBar> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_resolve_source_by_feed_kind() {
        let archive = TradeBar::resolve_source(&config(), as_of(), FeedKind::Backtest).unwrap();
        assert_eq!(archive.as_str(), "/archive/minute/spy/20240115_trade.csv");

        let live = TradeBar::resolve_source(&config(), as_of(), FeedKind::LiveTrading).unwrap();
        assert_eq!(
            live.as_str(),
            "wss://localhost:8765/v1/trade/SPY?resolution=minute"
        );
    }
}

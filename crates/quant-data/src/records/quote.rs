//! Top-of-book quotes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use quant_core::error::ParseError;
use quant_core::traits::DataRecord;
use quant_core::types::{DataPoint, FeedKind, SourceLocator, SubscriptionConfig};

use super::locate;
use crate::fields::Fields;

/// Best bid and offer for a symbol.
///
/// Line format: `time,bid,bid_size,ask,ask_size`. The data point is the mid
/// price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Instrument symbol
    pub symbol: String,
    /// Quote time
    pub time: DateTime<Utc>,
    /// Best bid price
    pub bid: f64,
    /// Bid size
    pub bid_size: f64,
    /// Best ask price
    pub ask: f64,
    /// Ask size
    pub ask_size: f64,
}

impl QuoteRecord {
    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Get the spread as a percentage of the mid price.
    pub fn spread_percent(&self) -> f64 {
        let mid = self.mid();
        if mid == 0.0 {
            0.0
        } else {
            (self.spread() / mid) * 100.0
        }
    }
}

impl PartialEq for QuoteRecord {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.data_point() == other.data_point()
    }
}

impl Eq for QuoteRecord {}

impl Hash for QuoteRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.data_point().hash(state);
    }
}

impl DataRecord for QuoteRecord {
    const KIND: &'static str = "quote";

    fn data_point(&self) -> DataPoint {
        DataPoint::new(self.time, self.mid())
    }

    fn parse(
        config: &SubscriptionConfig,
        line: &str,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<Self, ParseError> {
        let fields = Fields::split(Self::KIND, line, 5)?;
        let time = fields.time(0, config.resolution, as_of, feed)?;

        Ok(Self {
            symbol: config.symbol.clone(),
            time,
            bid: fields.non_negative(1, "bid")?,
            bid_size: fields.non_negative(2, "bid_size")?,
            ask: fields.non_negative(3, "ask")?,
            ask_size: fields.non_negative(4, "ask_size")?,
        })
    }

    fn resolve_source(
        config: &SubscriptionConfig,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<SourceLocator, ParseError> {
        Ok(locate(config, as_of, feed, "quote"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_core::types::{RecordKind, Resolution};

    fn config() -> SubscriptionConfig {
        SubscriptionConfig::new("EURUSD", Resolution::Tick).with_record_kind(RecordKind::Quote)
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_parse_and_mid() {
        let quote = QuoteRecord::parse(
            &config(),
            "1000,149.95,100,150.05,200",
            as_of(),
            FeedKind::Backtest,
        )
        .unwrap();

        assert!((quote.mid() - 150.0).abs() < 0.001);
        assert!((quote.spread() - 0.10).abs() < 0.001);
        assert!((quote.spread_percent() - 0.0667).abs() < 0.01);
        assert_eq!(quote.data_point().time.timestamp_millis() % 86_400_000, 1000);
    }

    #[test]
    fn test_negative_size_out_of_range() {
        let result = QuoteRecord::parse(
            &config(),
            "1000,1.0,-1,1.1,5",
            as_of(),
            FeedKind::Backtest,
        );
        assert!(matches!(
            result,
            Err(ParseError::OutOfRange {
                field: "bid_size",
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_source() {
        let archive = QuoteRecord::resolve_source(&config(), as_of(), FeedKind::Backtest).unwrap();
        assert_eq!(archive.as_str(), "data/tick/eurusd/20240301_quote.csv");
        assert!(!archive.is_url());

        let live = QuoteRecord::resolve_source(&config(), as_of(), FeedKind::LiveTrading).unwrap();
        assert!(live.is_url());
    }
}

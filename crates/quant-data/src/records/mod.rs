//! Concrete record variants and dispatch between them.

mod quote;
mod trade_bar;

pub use quote::QuoteRecord;
pub use trade_bar::TradeBar;

use chrono::NaiveDate;
use quant_core::error::ParseError;
use quant_core::traits::DataRecord;
use quant_core::types::{DataPoint, FeedKind, RecordKind, SourceLocator, SubscriptionConfig};

/// Location of a subscription's lines for one day.
///
/// Archives hold one file per day for intraday resolutions and a single
/// file per symbol for daily bars. Live endpoints are keyed by suffix and
/// symbol.
pub(crate) fn locate(
    config: &SubscriptionConfig,
    as_of: NaiveDate,
    feed: FeedKind,
    suffix: &str,
) -> SourceLocator {
    match feed {
        FeedKind::Backtest => {
            let root = config.source_root.trim_end_matches('/');
            let symbol = config.symbol.to_lowercase();
            if config.resolution.is_intraday() {
                SourceLocator::new(format!(
                    "{}/{}/{}/{}_{}.csv",
                    root,
                    config.resolution,
                    symbol,
                    as_of.format("%Y%m%d"),
                    suffix
                ))
            } else {
                SourceLocator::new(format!("{}/daily/{}_{}.csv", root, symbol, suffix))
            }
        }
        FeedKind::LiveTrading => SourceLocator::new(format!(
            "{}/{}/{}?resolution={}",
            config.stream_endpoint.trim_end_matches('/'),
            suffix,
            config.symbol.to_uppercase(),
            config.resolution
        )),
    }
}

/// Any record a subscription can produce, selected by
/// [`SubscriptionConfig::record_kind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Record {
    TradeBar(TradeBar),
    Quote(QuoteRecord),
    Point(DataPoint),
}

impl Record {
    /// Which variant this is.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::TradeBar(_) => RecordKind::TradeBar,
            Record::Quote(_) => RecordKind::Quote,
            Record::Point(_) => RecordKind::Point,
        }
    }
}

impl DataRecord for Record {
    const KIND: &'static str = "record";

    fn data_point(&self) -> DataPoint {
        match self {
            Record::TradeBar(bar) => bar.data_point(),
            Record::Quote(quote) => quote.data_point(),
            Record::Point(point) => *point,
        }
    }

    fn parse(
        config: &SubscriptionConfig,
        line: &str,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<Self, ParseError> {
        match config.record_kind {
            RecordKind::TradeBar => TradeBar::parse(config, line, as_of, feed).map(Record::TradeBar),
            RecordKind::Quote => QuoteRecord::parse(config, line, as_of, feed).map(Record::Quote),
            RecordKind::Point => DataPoint::parse(config, line, as_of, feed).map(Record::Point),
        }
    }

    fn resolve_source(
        config: &SubscriptionConfig,
        as_of: NaiveDate,
        feed: FeedKind,
    ) -> Result<SourceLocator, ParseError> {
        match config.record_kind {
            RecordKind::TradeBar => TradeBar::resolve_source(config, as_of, feed),
            RecordKind::Quote => QuoteRecord::resolve_source(config, as_of, feed),
            RecordKind::Point => DataPoint::resolve_source(config, as_of, feed),
        }
    }
}

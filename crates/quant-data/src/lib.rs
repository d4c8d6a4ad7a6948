//! Record variants, line feeds and ingestion.
//!
//! A [`Subscription`] turns raw lines from a [`LineSource`] into records and
//! pushes their points into an indicator graph.

mod fields;
mod feed;
mod ingest;
mod records;

pub use feed::{FileReplay, LineSource, LiveFeed, LiveFeedSender, DEFAULT_LIVE_CAPACITY};
pub use ingest::{
    Diagnostic, IndicatorValue, IngestReport, LineOutcome, StalePolicy, Subscription,
    MAX_DIAGNOSTICS,
};
pub use records::{QuoteRecord, Record, TradeBar};

use chrono::NaiveDate;
use quant_core::error::QuantError;
use quant_core::types::{FeedKind, SubscriptionConfig};
use quant_indicators::{build_pipeline, IndicatorConfig};

/// Build a backtest subscription for `config` and replay `from..=to`.
pub async fn replay_subscription(
    config: SubscriptionConfig,
    indicators: &[IndicatorConfig],
    policy: StalePolicy,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<(Subscription, IngestReport), QuantError> {
    let pipeline = build_pipeline(&config.symbol, indicators)?;
    let mut subscription =
        Subscription::new(config, FeedKind::Backtest, pipeline).with_stale_policy(policy);
    let report = subscription.replay(from, to).await?;
    Ok((subscription, report))
}

//! Resolve sources command.

use anyhow::Result;
use quant_config::AppConfig;
use quant_core::traits::DataRecord;
use quant_core::types::FeedKind;
use quant_data::Record;

use crate::cli::{selected, SourcesArgs};

pub fn run(args: SourcesArgs, config: &AppConfig) -> Result<()> {
    if config.pipelines.is_empty() {
        println!("No pipelines configured.");
        return Ok(());
    }

    for pipeline in config
        .pipelines
        .iter()
        .filter(|p| selected(&args.symbols, &p.symbol))
    {
        let subscription = pipeline.subscription(&config.feed);
        println!(
            "{} ({}, {})",
            subscription.symbol, subscription.record_kind, subscription.resolution
        );

        for feed in [FeedKind::Backtest, FeedKind::LiveTrading] {
            match Record::resolve_source(&subscription, args.date, feed) {
                Ok(locator) => println!("  {:<13} {}", feed.to_string(), locator),
                Err(e) => println!("  {:<13} unavailable: {}", feed.to_string(), e),
            }
        }
    }

    Ok(())
}

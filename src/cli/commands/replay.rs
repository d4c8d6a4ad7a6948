//! Replay command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{error, info};

use quant_config::AppConfig;
use quant_data::{replay_subscription, IndicatorValue, IngestReport, StalePolicy};

use crate::cli::{selected, OutputFormat, ReplayArgs};

/// Final state of one replayed pipeline.
#[derive(Debug, Serialize)]
struct ReplayResult {
    symbol: String,
    report: IngestReport,
    indicators: Vec<IndicatorValue>,
}

pub async fn run(args: ReplayArgs, config: AppConfig) -> Result<()> {
    let from = args.from;
    let to = args.to.unwrap_or(from);
    if from > to {
        anyhow::bail!("--from {} is after --to {}", from, to);
    }

    let policy = if config.feed.fail_on_stale {
        StalePolicy::Fail
    } else {
        StalePolicy::Drop
    };

    let pipelines: Vec<_> = config
        .pipelines
        .iter()
        .filter(|p| selected(&args.symbols, &p.symbol))
        .collect();
    if pipelines.is_empty() {
        anyhow::bail!("No configured pipeline matches the requested symbols");
    }

    info!("Replaying {} pipelines from {} to {}", pipelines.len(), from, to);

    // One task per subscription; each owns its graph
    let mut tasks = JoinSet::new();
    for pipeline in pipelines {
        let subscription = pipeline.subscription(&config.feed);
        let indicators = pipeline.indicators.clone();
        tasks.spawn(async move {
            let symbol = subscription.symbol.clone();
            let outcome = replay_subscription(subscription, &indicators, policy, from, to).await;
            (symbol, outcome)
        });
    }

    let mut results = Vec::new();
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (symbol, outcome) = joined.context("Replay task panicked")?;
        match outcome {
            Ok((subscription, report)) => results.push(ReplayResult {
                symbol,
                report,
                indicators: subscription.values(),
            }),
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Replay failed");
                failures += 1;
            }
        }
    }
    results.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => print_text(&results),
    }

    if let Some(save_path) = &args.save {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if failures > 0 {
        anyhow::bail!("{} of {} pipelines failed", failures, failures + results.len());
    }
    Ok(())
}

fn print_text(results: &[ReplayResult]) {
    for result in results {
        println!("{}", result.report.summary());
        for value in &result.indicators {
            match value.value {
                Some(point) if value.ready => {
                    println!("  {:<20} {:>14.6}  at {}", value.name, point.value, point.time)
                }
                _ => println!(
                    "  {:<20} {:>14}  ({} samples)",
                    value.name, "warming up", value.samples
                ),
            }
        }
        for diagnostic in &result.report.diagnostics {
            println!(
                "  ! {}:{}: {}",
                diagnostic.locator, diagnostic.line_number, diagnostic.reason
            );
        }
        println!();
    }
}

//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quant")]
#[command(author, version, about = "Streaming market data points and composable indicators")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "QUANT_CONFIG")]
    pub config: PathBuf,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay archived data through the configured pipelines
    Replay(ReplayArgs),
    /// Show where each pipeline's data is read from
    Sources(SourcesArgs),
    /// List available indicator kinds
    Indicators,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// First day to replay (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day to replay, defaults to the first
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only replay these symbols (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON results to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SourcesArgs {
    /// Day to resolve (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Only show these symbols (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

/// Whether `symbol` passes a possibly empty filter.
pub fn selected(filter: &[String], symbol: &str) -> bool {
    filter.is_empty() || filter.iter().any(|s| s.eq_ignore_ascii_case(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["quant", "indicators"]).unwrap();
        assert!(matches!(cli.command, Commands::Indicators));

        let cli = Cli::try_parse_from(["quant", "validate-config"]).unwrap();
        assert!(matches!(cli.command, Commands::ValidateConfig));

        let cli = Cli::try_parse_from([
            "quant", "replay", "--from", "2024-01-10", "-S", "spy,qqq", "--output", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
                assert_eq!(args.to, None);
                assert_eq!(args.symbols, vec!["spy", "qqq"]);
                assert!(args.output == OutputFormat::Json);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn test_symbol_filter() {
        assert!(selected(&[], "SPY"));
        assert!(selected(&["spy".to_string()], "SPY"));
        assert!(!selected(&["qqq".to_string()], "SPY"));
    }
}

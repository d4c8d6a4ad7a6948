//! Quant CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use quant_config::{load_config_or_default, AppConfig, SettingsError};
use quant_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config_or_default(&cli.config);

    // Setup logging, even when the config itself is broken
    let mut logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if let Some(level) = cli.log_level {
        logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        logging.format = "json".to_string();
    }
    let _guard = setup_logging(&logging);

    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded),
        Commands::Indicators => cli::commands::indicators::run(),
        Commands::Replay(args) => {
            let config = require(loaded, &cli.config)?;
            cli::commands::replay::run(args, config).await
        }
        Commands::Sources(args) => {
            let config = require(loaded, &cli.config)?;
            cli::commands::sources::run(args, &config)
        }
    }
}

fn require(loaded: Result<AppConfig, SettingsError>, path: &Path) -> Result<AppConfig> {
    loaded.with_context(|| format!("Failed to load {}", path.display()))
}

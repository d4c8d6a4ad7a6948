//! Validate configuration command.

use anyhow::Result;
use quant_config::{AppConfig, SettingsError};
use std::path::Path;

pub fn run(config_path: &Path, loaded: Result<AppConfig, SettingsError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found, using defaults and QUANT__* environment overrides");
    }

    match loaded {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Archive root: {}", config.feed.source_root);
            println!("Stream endpoint: {}", config.feed.stream_endpoint);
            println!("Pipelines: {}", config.pipelines.len());
            println!();
            println!("{}", config.to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, FeedSettings, LoggingConfig, PipelineConfig};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn environment() -> Environment {
    Environment::with_prefix("QUANT")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from file and environment, then validate it.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(environment())
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Like [`load_config`], but falls back to defaults when `path` does not
/// exist.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, SettingsError> {
    if path.exists() {
        return load_config(path);
    }

    let config = Config::builder().add_source(environment()).build()?;
    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

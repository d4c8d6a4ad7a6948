//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use quant_core::types::{RecordKind, Resolution, SubscriptionConfig};
use quant_indicators::{build_pipeline, IndicatorConfig};

use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "quant".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory-qualified file name for a daily rolling log
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Where record lines come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Root directory of the backtest archive
    pub source_root: String,
    /// Base URL of the live stream
    pub stream_endpoint: String,
    /// Resolution for pipelines that do not set one
    pub resolution: Resolution,
    /// Abort ingestion on out-of-order points instead of dropping them
    pub fail_on_stale: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let defaults = SubscriptionConfig::new("", Resolution::default());
        Self {
            source_root: defaults.source_root,
            stream_endpoint: defaults.stream_endpoint,
            resolution: defaults.resolution,
            fail_on_stale: false,
        }
    }
}

/// Indicators computed over one symbol's stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub symbol: String,
    #[serde(default)]
    pub record_kind: RecordKind,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

impl PipelineConfig {
    /// Subscription for this pipeline, filling gaps from `feed`.
    pub fn subscription(&self, feed: &FeedSettings) -> SubscriptionConfig {
        SubscriptionConfig::new(
            self.symbol.clone(),
            self.resolution.unwrap_or(feed.resolution),
        )
        .with_record_kind(self.record_kind)
        .with_source_root(feed.source_root.clone())
        .with_stream_endpoint(feed.stream_endpoint.clone())
    }
}

impl AppConfig {
    /// Check the configuration for problems loading cannot catch.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let format = self.logging.format.to_lowercase();
        if format != "pretty" && format != "json" {
            return Err(SettingsError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }

        if !self.feed.stream_endpoint.contains("://") {
            return Err(SettingsError::Invalid(format!(
                "feed.stream_endpoint is not a URL: '{}'",
                self.feed.stream_endpoint
            )));
        }

        let mut symbols = HashSet::new();
        for pipeline in &self.pipelines {
            if pipeline.symbol.trim().is_empty() {
                return Err(SettingsError::Invalid(
                    "pipeline symbol must not be empty".to_string(),
                ));
            }
            if !symbols.insert(pipeline.symbol.to_uppercase()) {
                return Err(SettingsError::Invalid(format!(
                    "duplicate pipeline for {}",
                    pipeline.symbol
                )));
            }
            build_pipeline(&pipeline.symbol, &pipeline.indicators).map_err(|e| {
                SettingsError::Invalid(format!("pipeline {}: {}", pipeline.symbol, e))
            })?;
        }

        Ok(())
    }

    /// Find the pipeline for `symbol`, ignoring case.
    pub fn pipeline(&self, symbol: &str) -> Option<&PipelineConfig> {
        self.pipelines
            .iter()
            .find(|p| p.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_indicators::IndicatorKind;

    fn pipeline(symbol: &str, indicators: Vec<IndicatorConfig>) -> PipelineConfig {
        PipelineConfig {
            symbol: symbol.to_string(),
            record_kind: RecordKind::TradeBar,
            resolution: None,
            indicators,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_subscription_inherits_feed_settings() {
        let feed = FeedSettings {
            source_root: "/archive".to_string(),
            resolution: Resolution::Hour,
            ..Default::default()
        };
        let sub = pipeline("SPY", vec![]).subscription(&feed);

        assert_eq!(sub.resolution, Resolution::Hour);
        assert_eq!(sub.source_root, "/archive");
        assert_eq!(sub.record_kind, RecordKind::TradeBar);
    }

    #[test]
    fn test_validate_rejects_bad_pipelines() {
        let mut config = AppConfig::default();
        config.pipelines = vec![
            pipeline("SPY", vec![]),
            pipeline("spy", vec![]),
        ];
        assert!(config.validate().is_err());

        config.pipelines = vec![pipeline(
            "SPY",
            vec![IndicatorConfig::new("slow", IndicatorKind::Sma, 5).reading("fast")],
        )];
        assert!(config.validate().is_err());

        config.pipelines = vec![pipeline(
            "SPY",
            vec![IndicatorConfig::new("bad", IndicatorKind::Sma, 0)],
        )];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.pipelines = vec![pipeline(
            "QQQ",
            vec![
                IndicatorConfig::new("rsi", IndicatorKind::Rsi, 14),
                IndicatorConfig::new("rsi_fast", IndicatorKind::Sma, 3).reading("rsi"),
            ],
        )];

        let rendered = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.pipelines[0].indicators, config.pipelines[0].indicators);
        assert_eq!(parsed.feed.resolution, Resolution::Minute);
    }
}

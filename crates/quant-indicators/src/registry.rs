//! Declarative indicator construction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use quant_core::error::IndicatorError;
use quant_core::traits::Indicator;

use crate::graph::{IndicatorGraph, IndicatorId};
use crate::momentum::{Momentum, RateOfChange, Rsi, Stochastic};
use crate::moving_average::{Sma, Sum, Wma};
use crate::state::{Identity, WindowIndicator};
use crate::volatility::{Maximum, Minimum, StdDev};

/// Available window kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Identity,
    Sma,
    Wma,
    Sum,
    Maximum,
    Minimum,
    Momentum,
    RateOfChange,
    StdDev,
    Rsi,
    Stochastic,
}

impl IndicatorKind {
    /// Get all available kinds.
    pub fn all() -> &'static [IndicatorKind] {
        &[
            IndicatorKind::Identity,
            IndicatorKind::Sma,
            IndicatorKind::Wma,
            IndicatorKind::Sum,
            IndicatorKind::Maximum,
            IndicatorKind::Minimum,
            IndicatorKind::Momentum,
            IndicatorKind::RateOfChange,
            IndicatorKind::StdDev,
            IndicatorKind::Rsi,
            IndicatorKind::Stochastic,
        ]
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            IndicatorKind::Identity => "Passes the latest value through",
            IndicatorKind::Sma => "Arithmetic mean of the last N values",
            IndicatorKind::Wma => "Linearly weighted mean of the last N values",
            IndicatorKind::Sum => "Sum of the last N values",
            IndicatorKind::Maximum => "Highest of the last N values",
            IndicatorKind::Minimum => "Lowest of the last N values",
            IndicatorKind::Momentum => "Change over N periods",
            IndicatorKind::RateOfChange => "Percentage change over N periods",
            IndicatorKind::StdDev => "Population standard deviation of the last N values",
            IndicatorKind::Rsi => "Relative strength index over N changes",
            IndicatorKind::Stochastic => "Position of the latest value in the N-period range",
        }
    }

    /// Smallest period the kind accepts.
    pub fn min_period(&self) -> usize {
        match self {
            IndicatorKind::StdDev => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndicatorKind::Identity => "identity",
            IndicatorKind::Sma => "sma",
            IndicatorKind::Wma => "wma",
            IndicatorKind::Sum => "sum",
            IndicatorKind::Maximum => "maximum",
            IndicatorKind::Minimum => "minimum",
            IndicatorKind::Momentum => "momentum",
            IndicatorKind::RateOfChange => "rate_of_change",
            IndicatorKind::StdDev => "std_dev",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Stochastic => "stochastic",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        IndicatorKind::all()
            .iter()
            .copied()
            .find(|kind| kind.to_string() == lower)
            .ok_or_else(|| format!("Unknown indicator kind: {}", s))
    }
}

/// Configuration of one indicator in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Unique name within the pipeline
    pub name: String,
    /// Kernel to run
    pub kind: IndicatorKind,
    /// Window period
    #[serde(default = "default_period")]
    pub period: usize,
    /// Name of the producing indicator; the raw stream when absent
    #[serde(default)]
    pub input: Option<String>,
}

fn default_period() -> usize {
    1
}

impl IndicatorConfig {
    /// Create a config reading the raw stream.
    pub fn new(name: impl Into<String>, kind: IndicatorKind, period: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            period,
            input: None,
        }
    }

    /// Read another indicator's output instead of the raw stream.
    pub fn reading(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Check the period against the kind's minimum.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.period < self.kind.min_period() {
            return Err(IndicatorError::InvalidParameter(format!(
                "{}: {} period must be at least {}, got {}",
                self.name,
                self.kind,
                self.kind.min_period(),
                self.period
            )));
        }
        Ok(())
    }

    /// Build the configured indicator.
    pub fn build(&self) -> Result<Box<dyn Indicator>, IndicatorError> {
        self.validate()?;
        let name = self.name.clone();
        let period = self.period;

        let indicator: Box<dyn Indicator> = match self.kind {
            IndicatorKind::Identity => Box::new(WindowIndicator::named(name, Identity)),
            IndicatorKind::Sma => Box::new(WindowIndicator::named(name, Sma::new(period))),
            IndicatorKind::Wma => Box::new(WindowIndicator::named(name, Wma::new(period))),
            IndicatorKind::Sum => Box::new(WindowIndicator::named(name, Sum::new(period))),
            IndicatorKind::Maximum => {
                Box::new(WindowIndicator::named(name, Maximum::new(period)))
            }
            IndicatorKind::Minimum => {
                Box::new(WindowIndicator::named(name, Minimum::new(period)))
            }
            IndicatorKind::Momentum => {
                Box::new(WindowIndicator::named(name, Momentum::new(period)))
            }
            IndicatorKind::RateOfChange => {
                Box::new(WindowIndicator::named(name, RateOfChange::new(period)))
            }
            IndicatorKind::StdDev => Box::new(WindowIndicator::named(name, StdDev::new(period))),
            IndicatorKind::Rsi => Box::new(WindowIndicator::named(name, Rsi::new(period))),
            IndicatorKind::Stochastic => {
                Box::new(WindowIndicator::named(name, Stochastic::new(period)))
            }
        };
        Ok(indicator)
    }
}

/// A graph built from configuration, with its raw-stream entry point.
#[derive(Debug)]
pub struct Pipeline {
    /// The wired indicators
    pub graph: IndicatorGraph,
    /// Entry node receiving raw points
    pub source: IndicatorId,
}

/// Wire `configs` into a graph fed by a source node named `source_name`.
///
/// Names must be unique and an `input` must refer to an indicator declared
/// earlier in the list, so the declaration order is a valid update order.
pub fn build_pipeline(
    source_name: &str,
    configs: &[IndicatorConfig],
) -> Result<Pipeline, IndicatorError> {
    let mut graph = IndicatorGraph::new();
    let source = graph.add_source(source_name);
    let mut declared: HashSet<&str> = HashSet::new();
    declared.insert(source_name);

    for config in configs {
        if !declared.insert(config.name.as_str()) {
            return Err(IndicatorError::InvalidParameter(format!(
                "Duplicate indicator name: {}",
                config.name
            )));
        }

        let producer = match &config.input {
            None => source,
            Some(input) if declared.contains(input.as_str()) && input != &config.name => graph
                .find(input)
                .ok_or_else(|| {
                    IndicatorError::InvalidParameter(format!("Unknown input: {}", input))
                })?,
            Some(input) => {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{} reads {} which is not declared before it",
                    config.name, input
                )))
            }
        };

        let id = graph.add_boxed(config.build()?);
        graph.connect(producer, id)?;
    }

    Ok(Pipeline { graph, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quant_core::types::DataPoint;

    fn at(secs: i64, value: f64) -> DataPoint {
        DataPoint::from_millis(secs * 1_000, value).unwrap()
    }

    #[test]
    fn test_kind_parse_and_display() {
        for kind in IndicatorKind::all() {
            assert_eq!(IndicatorKind::from_str(&kind.to_string()).unwrap(), *kind);
        }
        assert_eq!(IndicatorKind::from_str("RSI").unwrap(), IndicatorKind::Rsi);
        assert!(IndicatorKind::from_str("macd").is_err());
    }

    #[test]
    fn test_build_validates_period() {
        let zero = IndicatorConfig::new("bad", IndicatorKind::Sma, 0);
        assert!(matches!(
            zero.build(),
            Err(IndicatorError::InvalidParameter(_))
        ));

        let std_one = IndicatorConfig::new("bad_std", IndicatorKind::StdDev, 1);
        assert!(std_one.build().is_err());

        let ok = IndicatorConfig::new("sma", IndicatorKind::Sma, 3).build().unwrap();
        assert_eq!(ok.name(), "sma");
        assert_eq!(ok.warmup_period(), 3);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: IndicatorConfig =
            serde_json::from_str(r#"{"name":"rsi","kind":"rsi","period":14}"#).unwrap();
        assert_eq!(config.input, None);

        let config: IndicatorConfig =
            serde_json::from_str(r#"{"name":"raw","kind":"identity"}"#).unwrap();
        assert_eq!(config.period, 1);
    }

    #[test]
    fn test_build_pipeline_wires_inputs() {
        let configs = vec![
            IndicatorConfig::new("rsi", IndicatorKind::Rsi, 2),
            IndicatorConfig::new("rsi_smooth", IndicatorKind::Sma, 2).reading("rsi"),
        ];
        let mut pipeline = build_pipeline("close", &configs).unwrap();
        let rsi = pipeline.graph.find("rsi").unwrap();
        let smooth = pipeline.graph.find("rsi_smooth").unwrap();
        assert_eq!(pipeline.graph.consumers(rsi), &[smooth]);

        for (t, v) in [(1, 10.0), (2, 11.0), (3, 12.0), (4, 11.0)] {
            pipeline.graph.dispatch(pipeline.source, at(t, v)).unwrap();
        }

        // RSI(2): t3 = 100, t4 = 50; smoothed = 75
        let value = pipeline.graph.get(smooth).unwrap().current().unwrap();
        assert!((value.value - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_build_pipeline_rejects_forward_and_duplicate_names() {
        let forward = vec![
            IndicatorConfig::new("a", IndicatorKind::Sma, 2).reading("b"),
            IndicatorConfig::new("b", IndicatorKind::Sma, 2),
        ];
        assert!(build_pipeline("close", &forward).is_err());

        let duplicate = vec![
            IndicatorConfig::new("a", IndicatorKind::Sma, 2),
            IndicatorConfig::new("a", IndicatorKind::Wma, 2),
        ];
        assert!(build_pipeline("close", &duplicate).is_err());

        let shadows_source = vec![IndicatorConfig::new("close", IndicatorKind::Sma, 2)];
        assert!(build_pipeline("close", &shadows_source).is_err());
    }
}

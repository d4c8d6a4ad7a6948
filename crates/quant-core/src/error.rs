//! Error types for the quant system.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level quant system error.
#[derive(Error, Debug)]
pub enum QuantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while turning one raw source line into a record.
///
/// These are recoverable at the feed-ingestion boundary: the offending line
/// is skipped and reported, and never reaches an indicator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("{kind}: malformed line: {reason}")]
    Malformed { kind: &'static str, reason: String },

    #[error("{kind}: field '{field}' out of range: {value}")]
    OutOfRange {
        kind: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("{kind}: {operation} is not implemented")]
    NotImplemented {
        kind: &'static str,
        operation: &'static str,
    },
}

impl ParseError {
    /// Shorthand for a `Malformed` error.
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Source unavailable: {locator}: {reason}")]
    SourceUnavailable { locator: String, reason: String },

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Feed closed: {0}")]
    FeedClosed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator update and composition errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator}: point at {attempted} is earlier than last accepted {last}")]
    NonMonotonicTime {
        indicator: String,
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    #[error("Connecting {producer} -> {consumer} would create a cycle")]
    CycleDetected { producer: String, consumer: String },

    #[error("Window index {index} out of range for {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Unknown indicator id: {0}")]
    UnknownIndicator(usize),

    #[error("{producer} -> {consumer} is already connected")]
    DuplicateEdge { producer: String, consumer: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for quant operations.
pub type QuantResult<T> = Result<T, QuantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts_to_quant_error() {
        let err: QuantError = ParseError::malformed("trade_bar", "expected 6 fields").into();
        assert!(matches!(err, QuantError::Parse(ParseError::Malformed { .. })));
        assert_eq!(
            err.to_string(),
            "Parse error: trade_bar: malformed line: expected 6 fields"
        );
    }

    #[test]
    fn test_indicator_error_display() {
        let err = IndicatorError::CycleDetected {
            producer: "c".to_string(),
            consumer: "a".to_string(),
        };
        assert_eq!(err.to_string(), "Connecting c -> a would create a cycle");
    }
}

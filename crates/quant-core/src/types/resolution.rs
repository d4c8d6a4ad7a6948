//! Sampling resolution of a subscription.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling granularity of a data subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Every trade or quote
    Tick,
    /// 1 second bars
    Second,
    /// 1 minute bars
    #[default]
    Minute,
    /// 1 hour bars
    Hour,
    /// Daily bars
    Daily,
}

impl Resolution {
    /// Nominal sampling period in milliseconds (zero for tick data).
    pub fn as_millis(&self) -> u64 {
        match self {
            Resolution::Tick => 0,
            Resolution::Second => 1_000,
            Resolution::Minute => 60_000,
            Resolution::Hour => 3_600_000,
            Resolution::Daily => 86_400_000,
        }
    }

    /// Intraday sources are archived one file per calendar day.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Resolution::Daily)
    }

    /// Get all available resolutions.
    pub fn all() -> &'static [Resolution] {
        &[
            Resolution::Tick,
            Resolution::Second,
            Resolution::Minute,
            Resolution::Hour,
            Resolution::Daily,
        ]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Tick => "tick",
            Resolution::Second => "second",
            Resolution::Minute => "minute",
            Resolution::Hour => "hour",
            Resolution::Daily => "daily",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tick" => Ok(Resolution::Tick),
            "second" | "1s" | "sec" => Ok(Resolution::Second),
            "minute" | "1m" | "min" => Ok(Resolution::Minute),
            "hour" | "1h" => Ok(Resolution::Hour),
            "daily" | "day" | "1d" => Ok(Resolution::Daily),
            _ => Err(format!("Invalid resolution: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_duration() {
        assert_eq!(Resolution::Tick.as_millis(), 0);
        assert_eq!(Resolution::Minute.as_millis(), 60_000);
        assert_eq!(Resolution::Daily.as_millis(), 86_400_000);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!(Resolution::from_str("1m").unwrap(), Resolution::Minute);
        assert_eq!(Resolution::from_str("Daily").unwrap(), Resolution::Daily);
        assert!(Resolution::from_str("fortnight").is_err());
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for resolution in Resolution::all() {
            let parsed = Resolution::from_str(&resolution.to_string()).unwrap();
            assert_eq!(parsed, *resolution);
        }
    }

    #[test]
    fn test_is_intraday() {
        assert!(Resolution::Tick.is_intraday());
        assert!(Resolution::Hour.is_intraday());
        assert!(!Resolution::Daily.is_intraday());
    }
}

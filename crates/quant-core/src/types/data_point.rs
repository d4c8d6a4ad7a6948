//! The time-stamped value every record and indicator exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::traits::DataRecord;

/// A single value observed at a specific instant.
///
/// Equality is exact: two points are equal only when their timestamps match
/// and their values have the same bit pattern. No tolerance is applied, so
/// `0.0` and `-0.0` differ while two identical `NaN`s compare equal. Hashing
/// uses the same representation, which makes points safe as map keys and in
/// de-duplication sets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DataPoint {
    /// Instant the value applies to
    pub time: DateTime<Utc>,
    /// Observed or derived value
    pub value: f64,
}

impl DataPoint {
    /// Create a new data point.
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self { time, value }
    }

    /// Create a point from a Unix timestamp in milliseconds.
    ///
    /// Returns `None` when the timestamp is outside chrono's range.
    pub fn from_millis(millis: i64, value: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|time| Self { time, value })
    }

    /// Unix timestamp in milliseconds.
    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.time.timestamp_millis()
    }

    /// Same instant, different value.
    #[inline]
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            time: self.time,
            value,
        }
    }
}

impl PartialEq for DataPoint {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for DataPoint {}

impl Hash for DataPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.hash(state);
        self.value.to_bits().hash(state);
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time.format("%Y-%m-%d %H:%M:%S%.3f"), self.value)
    }
}

// Indicator outputs are plain points; they have no archival format of their
// own, so parsing and source resolution fall back to the trait defaults.
impl DataRecord for DataPoint {
    const KIND: &'static str = "data_point";

    fn data_point(&self) -> DataPoint {
        *self
    }
}

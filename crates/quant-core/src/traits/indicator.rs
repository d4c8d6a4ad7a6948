//! Indicator trait definitions.

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::types::DataPoint;

/// Result of feeding one point to an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Whether the warm-up period has been satisfied
    pub is_ready: bool,
    /// Latest derived value, `None` until the indicator first becomes ready
    pub current: Option<DataPoint>,
}

impl UpdateOutcome {
    /// The derived point, only when the indicator is ready.
    pub fn ready_point(&self) -> Option<DataPoint> {
        if self.is_ready {
            self.current
        } else {
            None
        }
    }
}

/// Streaming indicator that consumes data points one at a time.
///
/// Input time must be non-decreasing. A point with the same timestamp as the
/// last accepted one revises it; an earlier point is rejected with
/// `IndicatorError::NonMonotonicTime` and leaves the state untouched.
///
/// Implementations are not safe for concurrent mutation. Callers sharing one
/// instance across workers must serialize access themselves.
pub trait Indicator: Send {
    /// Update the indicator with a new point.
    fn update(&mut self, point: DataPoint) -> Result<UpdateOutcome, IndicatorError>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<DataPoint>;

    /// Return to the freshly constructed state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;

    /// Number of distinct instants consumed since construction or reset.
    fn samples(&self) -> usize;

    /// Get the minimum number of updates required before the value is valid.
    fn warmup_period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

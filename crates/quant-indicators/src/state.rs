//! Readiness tracking shared by every window indicator.

use chrono::{DateTime, Utc};
use std::fmt::Debug;

use quant_core::error::IndicatorError;
use quant_core::traits::{Indicator, UpdateOutcome};
use quant_core::types::DataPoint;

use crate::window::RollingWindow;

/// Derived-value computation over a window of points.
///
/// `compute` must be a pure function of the window contents: no state is
/// carried between calls, so revisions and resets need no extra bookkeeping.
pub trait Kernel: Debug + Send {
    /// Display name including parameters, e.g. `SMA(20)`.
    fn name(&self) -> String;

    /// Number of most recent points the computation reads.
    fn window_size(&self) -> usize;

    /// Updates required before the value is valid.
    fn warmup_period(&self) -> usize {
        self.window_size()
    }

    /// Derived value for the current window.
    ///
    /// Only called once the warm-up period is satisfied; the window is
    /// never empty.
    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64;

    /// Wrap the kernel in a streaming indicator named after it.
    fn into_indicator(self) -> WindowIndicator<Self>
    where
        Self: Sized,
    {
        WindowIndicator::new(self)
    }
}

/// Rolling state of one indicator.
///
/// `is_ready` always equals `samples_seen >= warmup_period`, and `current`
/// stays `None` until the first update at which the indicator is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorState {
    window: RollingWindow<DataPoint>,
    samples_seen: usize,
    warmup_period: usize,
    is_ready: bool,
    current: Option<DataPoint>,
}

impl IndicatorState {
    /// Create the initial state.
    pub fn new(window_size: usize, warmup_period: usize) -> Self {
        assert!(warmup_period > 0, "Warm-up period must be greater than 0");
        Self {
            window: RollingWindow::new(window_size),
            samples_seen: 0,
            warmup_period,
            is_ready: false,
            current: None,
        }
    }

    /// Points currently in the window.
    pub fn window(&self) -> &RollingWindow<DataPoint> {
        &self.window
    }

    /// Distinct instants accepted since construction or reset.
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// Updates required before the value is valid.
    pub fn warmup_period(&self) -> usize {
        self.warmup_period
    }

    /// Check if the warm-up period has been satisfied.
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// Latest derived value.
    pub fn current(&self) -> Option<DataPoint> {
        self.current
    }

    /// Time of the last accepted point.
    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.window.latest().map(|p| p.time)
    }

    /// Admit a point into the window.
    ///
    /// An earlier timestamp than the last accepted one is rejected without
    /// touching the state. An equal timestamp overwrites the newest slot and
    /// does not count as a new sample.
    pub fn accept(&mut self, indicator: &str, point: DataPoint) -> Result<(), IndicatorError> {
        match self.last_time() {
            Some(last) if point.time < last => {
                return Err(IndicatorError::NonMonotonicTime {
                    indicator: indicator.to_string(),
                    last,
                    attempted: point.time,
                });
            }
            Some(last) if point.time == last => {
                self.window.replace_latest(point);
            }
            _ => {
                self.window.push(point);
                self.samples_seen += 1;
            }
        }

        self.is_ready = self.samples_seen >= self.warmup_period;
        Ok(())
    }

    /// Record the derived value for the latest point.
    pub fn set_current(&mut self, point: DataPoint) {
        self.current = Some(point);
    }

    /// Back to the initial state; the warm-up period is kept.
    pub fn reset(&mut self) {
        self.window.clear();
        self.samples_seen = 0;
        self.is_ready = false;
        self.current = None;
    }

    /// Snapshot for reporting.
    pub fn outcome(&self) -> UpdateOutcome {
        UpdateOutcome {
            is_ready: self.is_ready,
            current: self.current,
        }
    }
}

/// A streaming indicator computed by a [`Kernel`] over a rolling window.
#[derive(Debug, Clone)]
pub struct WindowIndicator<K: Kernel> {
    name: String,
    kernel: K,
    state: IndicatorState,
}

impl<K: Kernel> WindowIndicator<K> {
    /// Create an indicator named after its kernel.
    pub fn new(kernel: K) -> Self {
        let name = kernel.name();
        Self::named(name, kernel)
    }

    /// Create an indicator with a custom diagnostic name.
    pub fn named(name: impl Into<String>, kernel: K) -> Self {
        let state = IndicatorState::new(kernel.window_size(), kernel.warmup_period());
        Self {
            name: name.into(),
            kernel,
            state,
        }
    }

    /// The underlying computation.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Rolling state, for inspection.
    pub fn state(&self) -> &IndicatorState {
        &self.state
    }
}

impl<K: Kernel> Indicator for WindowIndicator<K> {
    fn update(&mut self, point: DataPoint) -> Result<UpdateOutcome, IndicatorError> {
        self.state.accept(&self.name, point)?;

        if self.state.is_ready() {
            let value = self.kernel.compute(self.state.window());
            self.state.set_current(point.with_value(value));
        }

        Ok(self.state.outcome())
    }

    fn current(&self) -> Option<DataPoint> {
        self.state.current()
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    fn samples(&self) -> usize {
        self.state.samples_seen()
    }

    fn warmup_period(&self) -> usize {
        self.state.warmup_period()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Passes the latest value through unchanged.
///
/// Used as the entry node for a raw point stream in an
/// [`IndicatorGraph`](crate::graph::IndicatorGraph).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Kernel for Identity {
    fn name(&self) -> String {
        "IDENTITY".to_string()
    }

    fn window_size(&self) -> usize {
        1
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        window.latest().map(|p| p.value).unwrap_or(f64::NAN)
    }
}

//! Dispersion and range kernels.

use quant_core::types::DataPoint;

use crate::state::Kernel;
use crate::window::RollingWindow;

/// Population standard deviation of the last N values.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Kernel for StdDev {
    fn name(&self) -> String {
        format!("STD({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        let n = window.count() as f64;
        let mean: f64 = window.iter().map(|p| p.value).sum::<f64>() / n;
        let variance: f64 = window
            .iter()
            .map(|p| (p.value - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }
}

/// Highest value over the last N values.
#[derive(Debug, Clone)]
pub struct Maximum {
    period: usize,
}

impl Maximum {
    /// Create a new rolling maximum.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Maximum {
    fn name(&self) -> String {
        format!("MAX({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        window
            .iter()
            .map(|p| p.value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Lowest value over the last N values.
#[derive(Debug, Clone)]
pub struct Minimum {
    period: usize,
}

impl Minimum {
    /// Create a new rolling minimum.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Minimum {
    fn name(&self) -> String {
        format!("MIN({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        window.iter().map(|p| p.value).fold(f64::INFINITY, f64::min)
    }
}

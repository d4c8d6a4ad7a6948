//! Moving average kernels.

use quant_core::types::DataPoint;

use crate::state::Kernel;
use crate::window::RollingWindow;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Sma {
    fn name(&self) -> String {
        format!("SMA({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        let sum: f64 = window.iter().map(|p| p.value).sum();
        sum / window.count() as f64
    }
}

/// Weighted Moving Average (WMA).
///
/// Gives linearly decreasing weights to older values.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
}

impl Wma {
    /// Create a new WMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Wma {
    fn name(&self) -> String {
        format!("WMA({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        // Oldest gets weight 1, newest gets weight n
        let n = window.count();
        let weights_sum = (n * (n + 1)) as f64 / 2.0;
        let weighted: f64 = window
            .iter_chronological()
            .enumerate()
            .map(|(i, p)| p.value * (i + 1) as f64)
            .sum();
        weighted / weights_sum
    }
}

/// Rolling sum of the last N values.
#[derive(Debug, Clone)]
pub struct Sum {
    period: usize,
}

impl Sum {
    /// Create a new rolling sum.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Sum {
    fn name(&self) -> String {
        format!("SUM({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        window.iter().map(|p| p.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WindowIndicator;
    use quant_core::traits::Indicator;

    fn feed<K: Kernel>(kernel: K, values: &[f64]) -> Vec<Option<f64>> {
        let mut indicator = WindowIndicator::new(kernel);
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let point = DataPoint::from_millis(i as i64 * 60_000, v).unwrap();
                indicator.update(point).unwrap().current.map(|p| p.value)
            })
            .collect()
    }

    #[test]
    fn test_sma() {
        let result = feed(Sma::new(3), &[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result[..2], [None, None]);
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_wma() {
        let result = feed(Wma::new(3), &[1.0, 2.0, 3.0, 4.0]);

        // Weights: 1, 2, 3; sum = 6
        // (1*1 + 2*2 + 3*3) / 6 = 14/6
        assert!((result[2].unwrap() - 14.0 / 6.0).abs() < 1e-10);
        // (2*1 + 3*2 + 4*3) / 6 = 20/6
        assert!((result[3].unwrap() - 20.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_sum() {
        let result = feed(Sum::new(2), &[1.5, 2.5, 4.0]);

        assert!(result[0].is_none());
        assert!((result[1].unwrap() - 4.0).abs() < 1e-10);
        assert!((result[2].unwrap() - 6.5).abs() < 1e-10);
    }

    #[test]
    fn test_names() {
        assert_eq!(Sma::new(20).name(), "SMA(20)");
        assert_eq!(Wma::new(9).name(), "WMA(9)");
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_zero_period_rejected() {
        Sma::new(0);
    }
}

//! Momentum and oscillator kernels.

use quant_core::types::DataPoint;

use crate::state::Kernel;
use crate::window::RollingWindow;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent changes to evaluate
/// overbought or oversold conditions. Gains and losses are averaged with a
/// simple mean over the window (Cutler's variant), which keeps the value a
/// function of the window alone.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Kernel for Rsi {
    fn name(&self) -> String {
        format!("RSI({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period + 1 // Need period+1 points for period changes
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        let mut gains = 0.0;
        let mut losses = 0.0;
        let mut prev: Option<f64> = None;

        for point in window.iter_chronological() {
            if let Some(p) = prev {
                let change = point.value - p;
                if change > 0.0 {
                    gains += change;
                } else {
                    losses -= change;
                }
            }
            prev = Some(point.value);
        }

        if losses == 0.0 {
            if gains == 0.0 {
                50.0 // Flat window
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + gains / losses))
        }
    }
}

/// Absolute change over N periods (newest minus oldest).
#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
}

impl Momentum {
    /// Create a new momentum indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Momentum {
    fn name(&self) -> String {
        format!("MOM({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        match (window.latest(), window.oldest()) {
            (Some(newest), Some(oldest)) => newest.value - oldest.value,
            _ => f64::NAN,
        }
    }
}

/// Percentage change over N periods.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    period: usize,
}

impl RateOfChange {
    /// Create a new rate-of-change indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for RateOfChange {
    fn name(&self) -> String {
        format!("ROC({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        match (window.latest(), window.oldest()) {
            (Some(newest), Some(oldest)) if oldest.value != 0.0 => {
                (newest.value - oldest.value) / oldest.value * 100.0
            }
            (Some(_), Some(_)) => 0.0,
            _ => f64::NAN,
        }
    }
}

/// Stochastic %K over a single series.
///
/// Position of the latest value within the window's high-low range.
#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Kernel for Stochastic {
    fn name(&self) -> String {
        format!("STOCH({})", self.period)
    }

    fn window_size(&self) -> usize {
        self.period
    }

    fn compute(&self, window: &RollingWindow<DataPoint>) -> f64 {
        let highest = window.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let latest = window.latest().map(|p| p.value).unwrap_or(f64::NAN);

        let range = highest - lowest;
        if range == 0.0 {
            50.0 // Undefined, use midpoint
        } else {
            (latest - lowest) / range * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WindowIndicator;
    use quant_core::traits::Indicator;

    fn last_value<K: Kernel>(kernel: K, values: &[f64]) -> Option<f64> {
        let mut indicator = WindowIndicator::new(kernel);
        let mut last = None;
        for (i, &v) in values.iter().enumerate() {
            let point = DataPoint::from_millis(i as i64 * 1_000, v).unwrap();
            last = indicator.update(point).unwrap().current.map(|p| p.value);
        }
        last
    }

    #[test]
    fn test_rsi_bounded() {
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let mut rsi = WindowIndicator::new(Rsi::new(14));
        for (i, &v) in data.iter().enumerate() {
            let outcome = rsi.update(DataPoint::from_millis(i as i64, v).unwrap()).unwrap();
            if let Some(point) = outcome.current {
                assert!(point.value >= 0.0 && point.value <= 100.0);
            }
        }
        assert!(rsi.is_ready());
    }

    #[test]
    fn test_rsi_all_gains() {
        let value = last_value(Rsi::new(5), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert!((value - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let value = last_value(Rsi::new(5), &[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!(value.abs() < 1e-10);
    }

    #[test]
    fn test_rsi_warmup_is_period_plus_one() {
        assert!(last_value(Rsi::new(3), &[1.0, 2.0, 3.0]).is_none());
        assert!(last_value(Rsi::new(3), &[1.0, 2.0, 3.0, 2.0]).is_some());
    }

    #[test]
    fn test_rsi_balanced() {
        // Gains 2, losses 2
        let value = last_value(Rsi::new(2), &[10.0, 12.0, 10.0]).unwrap();
        assert!((value - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_momentum() {
        let value = last_value(Momentum::new(2), &[10.0, 11.0, 15.0, 13.0]).unwrap();
        // 13 - 11
        assert!((value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_rate_of_change() {
        let value = last_value(RateOfChange::new(1), &[50.0, 55.0]).unwrap();
        assert!((value - 10.0).abs() < 1e-10);

        let from_zero = last_value(RateOfChange::new(1), &[0.0, 5.0]).unwrap();
        assert_eq!(from_zero, 0.0);
    }

    #[test]
    fn test_stochastic_at_high() {
        let value = last_value(Stochastic::new(5), &[10.0, 12.0, 11.0, 13.0, 17.0]).unwrap();
        assert!((value - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_flat_range() {
        let value = last_value(Stochastic::new(3), &[4.0, 4.0, 4.0]).unwrap();
        assert!((value - 50.0).abs() < 1e-10);
    }
}

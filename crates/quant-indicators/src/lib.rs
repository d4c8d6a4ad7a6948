//! Streaming technical indicators and their composition.
//!
//! This crate provides:
//! - `RollingWindow`, the fixed-capacity buffer every indicator reads from
//! - `IndicatorState` / `WindowIndicator`, the warm-up and readiness state machine
//! - Window kernels: moving averages (SMA, WMA, sum), momentum (RSI, momentum,
//!   rate of change, stochastic) and dispersion (standard deviation, min, max)
//! - `IndicatorGraph`, which chains indicators through producer/consumer edges
//! - `IndicatorConfig` / `build_pipeline` for wiring graphs from configuration

pub mod graph;
pub mod momentum;
pub mod moving_average;
pub mod registry;
pub mod state;
pub mod volatility;
pub mod window;

pub use graph::{Emission, IndicatorGraph, IndicatorId};
pub use momentum::{Momentum, RateOfChange, Rsi, Stochastic};
pub use moving_average::{Sma, Sum, Wma};
pub use registry::{build_pipeline, IndicatorConfig, IndicatorKind, Pipeline};
pub use state::{Identity, IndicatorState, Kernel, WindowIndicator};
pub use volatility::{Maximum, Minimum, StdDev};
pub use window::RollingWindow;

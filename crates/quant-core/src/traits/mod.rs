//! Core traits for the quant system.

mod data_record;
mod indicator;

pub use data_record::DataRecord;
pub use indicator::{Indicator, UpdateOutcome};

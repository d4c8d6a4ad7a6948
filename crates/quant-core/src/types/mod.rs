//! Core data types for the quant system.

mod data_point;
mod resolution;
mod subscription;

pub use data_point::DataPoint;
pub use resolution::Resolution;
pub use subscription::{FeedKind, RecordKind, SourceLocator, SubscriptionConfig};

//! Core types and traits for the quant system.
//!
//! This crate provides the foundational building blocks including:
//! - The immutable, hashable `DataPoint`
//! - Subscription descriptors (`SubscriptionConfig`, `Resolution`, `FeedKind`)
//! - The `DataRecord` parsing contract and the streaming `Indicator` trait
//! - Error types shared by every other crate

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, IndicatorError, ParseError, QuantError, QuantResult};
pub use traits::*;
pub use types::*;

//! CLI command implementations.

pub mod indicators;
pub mod replay;
pub mod sources;
pub mod validate;

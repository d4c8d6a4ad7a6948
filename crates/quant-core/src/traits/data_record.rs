//! Record parsing contract.

use chrono::NaiveDate;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ParseError;
use crate::types::{DataPoint, FeedKind, SourceLocator, SubscriptionConfig};

/// A typed representation of one parsed source line.
///
/// Each variant decodes its own line format and knows where its lines live.
/// Equality and hashing cover the record's `DataPoint` plus whatever identity
/// fields the variant adds (usually the symbol), so `a == b` implies equal
/// hashes.
///
/// `parse` and `resolve_source` default to `ParseError::NotImplemented`.
/// Variants that have a source format must override both.
pub trait DataRecord: Debug + Clone + Eq + Hash + Send + Sync + Sized + 'static {
    /// Short name used in diagnostics.
    const KIND: &'static str;

    /// The point this record represents at its instant.
    fn data_point(&self) -> DataPoint;

    /// Build one record from one line of source data.
    ///
    /// # Arguments
    /// * `config` - The subscription being read
    /// * `line` - One non-empty line in the source's native encoding
    /// * `as_of` - Calendar day the line belongs to
    /// * `feed` - Whether the line came from a replay archive or a live feed
    fn parse(
        _config: &SubscriptionConfig,
        _line: &str,
        _as_of: NaiveDate,
        _feed: FeedKind,
    ) -> Result<Self, ParseError> {
        Err(ParseError::NotImplemented {
            kind: Self::KIND,
            operation: "parse",
        })
    }

    /// Where lines for `config` on `as_of` are read from.
    fn resolve_source(
        _config: &SubscriptionConfig,
        _as_of: NaiveDate,
        _feed: FeedKind,
    ) -> Result<SourceLocator, ParseError> {
        Err(ParseError::NotImplemented {
            kind: Self::KIND,
            operation: "resolve_source",
        })
    }
}

//! Typed errors for listing normalization.
//!
//! Both variants are per-row failures: a batch driver is expected to log
//! them and carry on with the next row.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Location has fewer than the three trailing segments city/region/community
    #[error("malformed location {location:?}: expected at least 3 comma-separated segments, found {segments}")]
    MalformedLocation { location: String, segments: usize },

    /// A required raw key is not present in the row
    #[error("missing required field: {key}")]
    MissingField { key: String },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

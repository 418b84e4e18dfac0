//! Error types for memocache

use thiserror::Error;

/// Result type alias for memocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and range queries
///
/// Lookups never fail: a missing key is `None`, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cache capacity must be at least 1
    #[error("Cache capacity must be greater than 0")]
    ZeroCapacity,

    /// Interval with `low > high`
    #[error("Invalid interval: low {low} is greater than high {high}")]
    InvalidInterval {
        /// Lower bound supplied by the caller
        low: usize,
        /// Upper bound supplied by the caller
        high: usize,
    },

    /// Index past the end of the backing array
    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Length of the backing array
        len: usize,
    },

    /// Range sum does not fit in an `i64`
    #[error("Sum of range [{low}, {high}] overflows i64")]
    Overflow {
        /// Lower bound of the range
        low: usize,
        /// Upper bound of the range
        high: usize,
    },

    /// Configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

//! # Error Types
//!
//! Construction-time validation failures for core primitives. Protocol
//! errors (status, authorization, window) live in `wager-engine`.

use thiserror::Error;

/// A primitive value was rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier string is empty, too long, or contains forbidden characters.
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Which identifier type was being constructed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Amount arithmetic overflowed or underflowed.
    #[error("amount arithmetic out of range: {0}")]
    AmountOutOfRange(String),

    /// Basis points above 10000.
    #[error("basis points {0} exceed 10000")]
    BasisPointsOutOfRange(u32),

    /// Timestamp could not be represented.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

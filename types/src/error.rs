//! Top-level error type shared across crates.

use thiserror::Error;

/// Parsing failures for the primitive types in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("number {0} does not fit into the wire width")]
    OutOfRange(String),
}

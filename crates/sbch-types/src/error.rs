//! Parse errors for block references

use thiserror::Error;

/// Failure to parse a block number, tag or hash
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBlockNumberError {
    /// Not a known tag and not a hex quantity
    #[error("invalid block tag: {0}")]
    InvalidTag(String),

    /// Hex quantity that does not fit in a u64
    #[error("invalid block number: {0}")]
    InvalidNumber(String),

    /// Malformed 32-byte block hash
    #[error("invalid block hash: {0}")]
    InvalidHash(String),
}

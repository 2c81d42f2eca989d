//! # Error Types
//!
//! Errors shared across the index components.

use thiserror::Error;

use crate::entities::BlockNumber;

/// Address parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string does not start with `0x`.
    #[error("address is not 0x-prefixed: {0}")]
    MissingPrefix(String),

    /// Wrong number of hex digits.
    #[error("address {input} has {len} hex digits, expected 40")]
    BadLength { input: String, len: usize },

    /// Non-hex characters.
    #[error("address is not valid hex: {0}")]
    NotHex(String),
}

/// Errors reported by the external chain reader.
///
/// The index never talks to a node directly; whatever transport sits behind
/// [`crate::ChainReader`] maps its failures into this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainReadError {
    /// The node does not know this block.
    #[error("block not found: {0}")]
    BlockNotFound(BlockNumber),

    /// The node does not know this transaction.
    #[error("transaction not found: 0x{0}")]
    TransactionNotFound(String),

    /// Transport or node-side failure.
    #[error("chain reader error: {0}")]
    Connection(String),

    /// The node answered with something unparseable.
    #[error("malformed chain response: {0}")]
    Malformed(String),
}

/// Failure to parse a `%09d-%09d` block range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid block range in {input}: {reason}")]
pub struct RangeParseError {
    pub input: String,
    pub reason: &'static str,
}

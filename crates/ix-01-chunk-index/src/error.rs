//! Error types for the chunk index

use std::path::PathBuf;

use shared_types::RangeParseError;
use thiserror::Error;

/// Errors that can occur reading or writing chunks
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error in {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Bad chunk magic in {path}: {found:#010x}")]
    BadMagic { path: PathBuf, found: u32 },

    #[error("Content hash mismatch in {path}")]
    HashMismatch { path: PathBuf },

    #[error("Appearance count mismatch: caller said {expected}, map holds {actual}")]
    CountMismatch { expected: u64, actual: u64 },

    #[error("Chunk too large: {count} appearances exceed the 32-bit offset table")]
    TooLarge { count: u64 },

    #[error("Invalid address key: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Range(#[from] RangeParseError),

    #[error("Bloom filter serialization error: {0}")]
    Bloom(String),

    #[error("Invalid chunk configuration: {0}")]
    InvalidConfig(String),
}

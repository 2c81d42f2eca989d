//! Error types for address monitors

use std::path::PathBuf;

use ix_01_chunk_index::ChunkError;
use shared_types::Address;
use thiserror::Error;

/// Errors that can occur operating on monitor files
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error in {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Bad monitor magic in {path}: {found:#06x}")]
    BadMagic { path: PathBuf, found: u16 },

    #[error("Record index {index} out of range (monitor holds {count})")]
    IndexOutOfRange { index: u32, count: u32 },

    #[error("Monitor for {address} is not staged")]
    NotStaged { address: Address },

    #[error("Monitor for {address} is not marked deleted")]
    NotDeleted { address: Address },

    #[error("Invalid override entry on line {line}: {entry}")]
    InvalidOverrideEntry { line: u64, entry: String },

    #[error("Chunk index error: {0}")]
    Chunk(#[from] ChunkError),
}

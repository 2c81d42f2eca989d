//! Runtime error types

use std::path::PathBuf;

use ix_01_chunk_index::ChunkError;
use shared_types::ChainReadError;
use thiserror::Error;

/// Bootstrap failures. Scratch-folder cleanup never produces one.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    Chain(#[from] ChainReadError),

    #[error("Cannot load genesis allocations: {0}")]
    Genesis(String),

    #[error("Cannot write timestamp: {0}")]
    Timestamp(String),

    #[error("Pin hook failed: {0}")]
    Pin(String),

    #[error("Corrupt bootstrap state in {path}: {reason}")]
    State { path: PathBuf, reason: String },

    #[error("Bootstrap for this chain is already running ({path})")]
    Locked { path: PathBuf },
}

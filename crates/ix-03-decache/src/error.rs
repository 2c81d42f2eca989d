//! Error types for cache invalidation

use shared_types::{BlockNumber, ChainReadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecacheError {
    #[error(transparent)]
    Chain(#[from] ChainReadError),

    #[error("Invalid block range {start}-{end}")]
    InvalidRange { start: BlockNumber, end: BlockNumber },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! # Collaborator Ports
//!
//! Bootstrap depends on three external collaborators besides the chain
//! reader. Each is a narrow async trait so tests can count calls.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::Address;

use crate::error::BootstrapError;

/// One genesis allocation. Only the address is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    pub address: Address,
    pub balance: String,
}

/// Source of the chain's genesis allocations (Driven Port).
///
/// Must return allocations in a stable order: the position of each
/// allocation becomes its transaction id in the block-zero chunk.
#[async_trait]
pub trait GenesisSource: Send + Sync {
    async fn allocations(&self, chain: &str) -> Result<Vec<GenesisAllocation>, BootstrapError>;
}

/// `{block, timestamp}` pair, 8 bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRecord {
    pub block_number: u32,
    pub timestamp: u32,
}

/// Timestamp database (Driven Port).
#[async_trait]
pub trait TimestampStore: Send + Sync {
    async fn put(&self, chain: &str, record: TimestampRecord) -> Result<(), BootstrapError>;

    async fn get(&self, chain: &str, block_number: u32)
        -> Result<Option<TimestampRecord>, BootstrapError>;
}

/// Notified whenever a new chunk exists (Driven Port).
#[async_trait]
pub trait PinHook: Send + Sync {
    async fn chunk_written(&self, chain: &str, chunk: &Path) -> Result<(), BootstrapError>;
}

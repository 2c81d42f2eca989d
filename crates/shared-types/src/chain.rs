//! # Chain Reader Port
//!
//! The narrow contract the index needs from a blockchain node. Transport,
//! retries and JSON decoding belong to whoever implements this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{BlockNumber, Hash, TxIndex};
use crate::errors::ChainReadError;

/// The parts of a block header the index consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightBlockHeader {
    pub number: BlockNumber,
    /// Unix seconds. Some nodes report 0 for the genesis block.
    pub timestamp: u64,
    pub transaction_count: u64,
}

/// Read-only access to chain data (Driven Port).
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Header of block `number`.
    async fn block_header(&self, number: BlockNumber) -> Result<LightBlockHeader, ChainReadError>;

    /// Timestamp of block `number` in Unix seconds.
    async fn block_timestamp(&self, number: BlockNumber) -> Result<u64, ChainReadError> {
        Ok(self.block_header(number).await?.timestamp)
    }

    /// Locate a transaction by hash, returning `(block, index)`.
    async fn transaction_location(&self, hash: &Hash)
        -> Result<(BlockNumber, TxIndex), ChainReadError>;

    /// Most recent block the node knows about.
    async fn latest_block(&self) -> Result<BlockNumber, ChainReadError>;
}

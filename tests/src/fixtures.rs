//! Shared fixtures for the integration flows.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use index_runtime::IndexConfig;
use ix_01_chunk_index::{AddressAppearanceMap, RangeChunkStore};
use shared_types::{
    Address, AppearanceRecord, BlockNumber, BlockRange, ChainReadError, ChainReader, Hash,
    LightBlockHeader, TxIndex,
};
use tempfile::TempDir;

pub const CHAIN: &str = "mainnet";

/// Chain reader backed by maps.
#[derive(Debug, Default, Clone)]
pub struct InMemoryChain {
    pub headers: HashMap<BlockNumber, LightBlockHeader>,
    pub transactions: HashMap<Hash, (BlockNumber, TxIndex)>,
}

impl InMemoryChain {
    /// Blocks `0..count`, block `n` stamped `base + 13 * n` with `n % 3`
    /// transactions.
    pub fn linear(count: u64, base: u64) -> Self {
        let mut chain = Self::default();
        for number in 0..count {
            chain.headers.insert(
                number,
                LightBlockHeader {
                    number,
                    timestamp: base + 13 * number,
                    transaction_count: number % 3,
                },
            );
        }
        chain
    }

    pub fn with_transaction(mut self, hash: Hash, block: BlockNumber, index: TxIndex) -> Self {
        self.transactions.insert(hash, (block, index));
        self
    }
}

#[async_trait]
impl ChainReader for InMemoryChain {
    async fn block_header(&self, number: BlockNumber) -> Result<LightBlockHeader, ChainReadError> {
        self.headers
            .get(&number)
            .cloned()
            .ok_or(ChainReadError::BlockNotFound(number))
    }

    async fn transaction_location(
        &self,
        hash: &Hash,
    ) -> Result<(BlockNumber, TxIndex), ChainReadError> {
        self.transactions
            .get(hash)
            .copied()
            .ok_or_else(|| ChainReadError::TransactionNotFound(format!("{:?}", hash)))
    }

    async fn latest_block(&self) -> Result<BlockNumber, ChainReadError> {
        Ok(self.headers.keys().max().copied().unwrap_or(0))
    }
}

/// Config rooted in a fresh temp dir, with no override list.
pub fn temp_config() -> (TempDir, IndexConfig) {
    let dir = TempDir::new().unwrap();
    let config = IndexConfig::under(dir.path())
        .with_override_file(dir.path().join("addresses.csv"));
    (dir, config)
}

pub fn address(byte: u8) -> Address {
    Address([byte; 20])
}

/// Write a finalized chunk holding `entries` as `(address, block, tx)`.
pub fn write_chunk(
    store: &RangeChunkStore,
    range: BlockRange,
    entries: &[(Address, u32, u32)],
) -> PathBuf {
    let map: AddressAppearanceMap = entries
        .iter()
        .map(|(a, b, t)| (*a, AppearanceRecord::new(*b, *t)))
        .collect();
    let path = store.chunk_path(range);
    store
        .write_chunk(&path, &map, map.address_count(), None)
        .unwrap();
    path
}

//! # Block-Zero Chunk Builder
//!
//! Writes the genesis chunk (every allocation appears at block 0 with its
//! allocation index as transaction id), records block 0's timestamp and
//! requests a pin, resuming from whichever step last completed.

use std::sync::Arc;

use index_telemetry::chain_span;
use ix_01_chunk_index::{clean_temporary_folders, AddressAppearanceMap, RangeChunkStore};
use serde::Serialize;
use shared_types::{AppearanceRecord, BlockRange, ChainReader, IndexPaths};
use tracing::{info, warn, Instrument};

use super::state::{BootstrapState, BootstrapStateFile};
use crate::adapters::BootstrapLock;
use crate::error::BootstrapError;
use crate::ports::{GenesisSource, PinHook, TimestampRecord, TimestampStore};

/// Seconds subtracted from block 1's timestamp when a node reports 0 for
/// the genesis block. Mainnet-specific; other chains may differ.
pub const GENESIS_TIMESTAMP_OFFSET: u64 = 13;

/// What a bootstrap run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub initial: BootstrapState,
    pub state: BootstrapState,
    pub chunk_written: bool,
    pub timestamp: Option<u32>,
    pub pinned: bool,
}

/// Builder for the block-zero chunk.
pub struct BootstrapBuilder {
    paths: IndexPaths,
    store: RangeChunkStore,
    reader: Arc<dyn ChainReader>,
    genesis: Arc<dyn GenesisSource>,
    timestamps: Arc<dyn TimestampStore>,
    pin: Arc<dyn PinHook>,
}

impl BootstrapBuilder {
    pub fn new(
        paths: IndexPaths,
        store: RangeChunkStore,
        reader: Arc<dyn ChainReader>,
        genesis: Arc<dyn GenesisSource>,
        timestamps: Arc<dyn TimestampStore>,
        pin: Arc<dyn PinHook>,
    ) -> Self {
        Self {
            paths,
            store,
            reader,
            genesis,
            timestamps,
            pin,
        }
    }

    fn chain(&self) -> &str {
        self.store.chain()
    }

    /// Run every step that has not completed yet.
    pub async fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        let span = chain_span!("bootstrap", self.chain());
        self.run_steps().instrument(span).await
    }

    async fn run_steps(&self) -> Result<BootstrapReport, BootstrapError> {
        let chain_index = self.paths.chain_index(self.chain());
        let _lock = BootstrapLock::acquire(&chain_index)?;

        let cleaned = clean_temporary_folders(&chain_index, false);
        for (path, reason) in &cleaned.failures {
            warn!(path = %path.display(), %reason, "Scratch folder cleanup failed, continuing");
        }

        let chunk_path = self.store.chunk_path(BlockRange::new(0, 0));
        let state_file = BootstrapStateFile::new(&chain_index);
        let initial = state_file.load()?.reconcile(chunk_path.is_file());

        let mut report = BootstrapReport {
            initial,
            state: initial,
            chunk_written: false,
            timestamp: None,
            pinned: false,
        };
        if initial == BootstrapState::Pinned {
            info!("Block-zero chunk already in place");
            return Ok(report);
        }

        if report.state == BootstrapState::NotStarted {
            let allocations = self.genesis.allocations(self.chain()).await?;
            let mut map = AddressAppearanceMap::new();
            for (index, allocation) in allocations.iter().enumerate() {
                let tx = u32::try_from(index).map_err(|_| {
                    BootstrapError::Genesis(format!("{} allocations exceed u32", allocations.len()))
                })?;
                map.insert(allocation.address, AppearanceRecord::new(0, tx));
            }
            self.store
                .write_chunk(&chunk_path, &map, allocations.len() as u64, None)?;
            report.chunk_written = true;
            report.state = BootstrapState::ChunkWritten;
            state_file.store(report.state)?;
        }

        if report.state == BootstrapState::ChunkWritten {
            let timestamp = self.genesis_timestamp().await?;
            self.timestamps
                .put(
                    self.chain(),
                    TimestampRecord {
                        block_number: 0,
                        timestamp,
                    },
                )
                .await?;
            report.timestamp = Some(timestamp);
            report.state = BootstrapState::TimestampWritten;
            state_file.store(report.state)?;
        }

        if report.state == BootstrapState::TimestampWritten {
            self.pin.chunk_written(self.chain(), &chunk_path).await?;
            report.pinned = true;
            report.state = BootstrapState::Pinned;
            state_file.store(report.state)?;
        }

        info!(
            from = ?report.initial,
            chunk_written = report.chunk_written,
            "Bootstrap complete"
        );
        Ok(report)
    }

    async fn genesis_timestamp(&self) -> Result<u32, BootstrapError> {
        let mut timestamp = self.reader.block_timestamp(0).await?;
        if timestamp == 0 {
            let next = self.reader.block_timestamp(1).await?;
            timestamp = next.saturating_sub(GENESIS_TIMESTAMP_OFFSET);
            warn!(timestamp, "Node reports 0 for block 0, derived from block 1");
        }
        u32::try_from(timestamp)
            .map_err(|_| BootstrapError::Timestamp(format!("{} does not fit u32", timestamp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use ix_01_chunk_index::ChunkConfig;
    use shared_types::{Address, BlockNumber, ChainReadError, Hash, LightBlockHeader, TxIndex};
    use tempfile::TempDir;

    use crate::ports::GenesisAllocation;

    const CHAIN: &str = "mainnet";

    struct MockChainReader {
        timestamps: [u64; 2],
    }

    #[async_trait]
    impl ChainReader for MockChainReader {
        async fn block_header(&self, number: BlockNumber) -> Result<LightBlockHeader, ChainReadError> {
            let timestamp = *self
                .timestamps
                .get(number as usize)
                .ok_or(ChainReadError::BlockNotFound(number))?;
            Ok(LightBlockHeader {
                number,
                timestamp,
                transaction_count: 0,
            })
        }

        async fn transaction_location(
            &self,
            _hash: &Hash,
        ) -> Result<(BlockNumber, TxIndex), ChainReadError> {
            Err(ChainReadError::Connection("unused".to_string()))
        }

        async fn latest_block(&self) -> Result<BlockNumber, ChainReadError> {
            Ok(1)
        }
    }

    #[derive(Default)]
    struct CountingGenesis {
        calls: AtomicUsize,
    }

    fn alloc(b: u8) -> GenesisAllocation {
        GenesisAllocation {
            address: Address([b; 20]),
            balance: "1".to_string(),
        }
    }

    #[async_trait]
    impl GenesisSource for CountingGenesis {
        async fn allocations(&self, _chain: &str) -> Result<Vec<GenesisAllocation>, BootstrapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![alloc(0xcc), alloc(0xaa), alloc(0xbb)])
        }
    }

    #[derive(Default)]
    struct MemoryTimestamps {
        puts: Mutex<Vec<TimestampRecord>>,
    }

    #[async_trait]
    impl TimestampStore for MemoryTimestamps {
        async fn put(&self, _chain: &str, record: TimestampRecord) -> Result<(), BootstrapError> {
            self.puts.lock().unwrap().push(record);
            Ok(())
        }

        async fn get(
            &self,
            _chain: &str,
            block_number: u32,
        ) -> Result<Option<TimestampRecord>, BootstrapError> {
            Ok(self
                .puts
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|r| r.block_number == block_number)
                .copied())
        }
    }

    /// Fails the first `fail_first` calls.
    #[derive(Default)]
    struct FlakyPin {
        fail_first: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PinHook for FlakyPin {
        async fn chunk_written(&self, _chain: &str, _chunk: &Path) -> Result<(), BootstrapError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                return Err(BootstrapError::Pin("gateway unavailable".to_string()));
            }
            Ok(())
        }
    }

    struct Fixture {
        _dir: TempDir,
        paths: IndexPaths,
        genesis: Arc<CountingGenesis>,
        timestamps: Arc<MemoryTimestamps>,
        pin: Arc<FlakyPin>,
        builder: BootstrapBuilder,
    }

    fn fixture(ts: [u64; 2], fail_first: usize) -> Fixture {
        let dir = TempDir::new().unwrap();
        let paths = IndexPaths::under(dir.path());
        let store = RangeChunkStore::new(paths.clone(), CHAIN, ChunkConfig::default()).unwrap();
        let genesis = Arc::new(CountingGenesis::default());
        let timestamps = Arc::new(MemoryTimestamps::default());
        let pin = Arc::new(FlakyPin {
            fail_first,
            ..Default::default()
        });
        let builder = BootstrapBuilder::new(
            paths.clone(),
            store,
            Arc::new(MockChainReader { timestamps: ts }),
            genesis.clone(),
            timestamps.clone(),
            pin.clone(),
        );
        Fixture {
            _dir: dir,
            paths,
            genesis,
            timestamps,
            pin,
            builder,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let f = fixture([1_438_269_973, 1_438_269_988], 0);

        let first = f.builder.run().await.unwrap();
        assert_eq!(first.initial, BootstrapState::NotStarted);
        assert_eq!(first.state, BootstrapState::Pinned);
        assert!(first.chunk_written);
        assert_eq!(first.timestamp, Some(1_438_269_973));

        let second = f.builder.run().await.unwrap();
        assert_eq!(second.initial, BootstrapState::Pinned);
        assert!(!second.chunk_written);
        assert!(!second.pinned);

        assert_eq!(f.genesis.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.timestamps.puts.lock().unwrap().len(), 1);
        assert_eq!(f.pin.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_allocation_index_is_transaction_id() {
        let f = fixture([100, 113], 0);
        f.builder.run().await.unwrap();

        let store = RangeChunkStore::new(f.paths.clone(), CHAIN, ChunkConfig::default()).unwrap();
        let path = store.chunk_path(BlockRange::new(0, 0));
        let reader = store.open_chunk(&path).unwrap();
        assert_eq!(reader.header().address_count, 3);
        assert_eq!(
            reader.appearances_for(&Address([0xcc; 20])),
            vec![AppearanceRecord::new(0, 0)]
        );
        assert_eq!(
            reader.appearances_for(&Address([0xbb; 20])),
            vec![AppearanceRecord::new(0, 2)]
        );
    }

    #[tokio::test]
    async fn test_zero_genesis_timestamp_falls_back_to_block_one() {
        let f = fixture([0, 1_000], 0);
        let report = f.builder.run().await.unwrap();
        assert_eq!(report.timestamp, Some(987));
        assert_eq!(
            f.timestamps.get(CHAIN, 0).await.unwrap(),
            Some(TimestampRecord {
                block_number: 0,
                timestamp: 987
            })
        );
    }

    #[tokio::test]
    async fn test_resume_after_failed_pin() {
        let f = fixture([50, 63], 1);

        assert!(matches!(f.builder.run().await, Err(BootstrapError::Pin(_))));
        let state_file = BootstrapStateFile::new(&f.paths.chain_index(CHAIN));
        assert_eq!(state_file.load().unwrap(), BootstrapState::TimestampWritten);

        let report = f.builder.run().await.unwrap();
        assert_eq!(report.initial, BootstrapState::TimestampWritten);
        assert!(report.pinned);
        assert!(!report.chunk_written);
        assert_eq!(f.genesis.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.timestamps.puts.lock().unwrap().len(), 1);
        assert_eq!(f.pin.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_chunk_restarts_from_scratch() {
        let f = fixture([50, 63], 0);
        f.builder.run().await.unwrap();

        let store = RangeChunkStore::new(f.paths.clone(), CHAIN, ChunkConfig::default()).unwrap();
        std::fs::remove_file(store.chunk_path(BlockRange::new(0, 0))).unwrap();

        let report = f.builder.run().await.unwrap();
        assert_eq!(report.initial, BootstrapState::NotStarted);
        assert!(report.chunk_written);
        assert_eq!(f.genesis.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_scratch_folders_cleaned_staging_kept() {
        let f = fixture([50, 63], 0);
        let chain_index = f.paths.chain_index(CHAIN);
        for folder in ["ripe", "staging"] {
            std::fs::create_dir_all(chain_index.join(folder)).unwrap();
            std::fs::write(chain_index.join(folder).join("partial"), "x").unwrap();
        }

        f.builder.run().await.unwrap();
        assert!(!chain_index.join("ripe").join("partial").exists());
        assert!(chain_index.join("staging").join("partial").exists());
    }
}

//! # Bootstrap Flow
//!
//! Genesis allocations become the block-zero chunk, which monitors then pick
//! up like any other chunk.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use index_runtime::adapters::FileTimestampStore;
    use index_runtime::{
        BootstrapError, BootstrapState, IndexRuntime, TimestampRecord, TimestampStore,
    };
    use ix_02_address_monitors::Monitor;
    use shared_types::{AppearanceRecord, BlockRange, ChainReader};

    use crate::fixtures::{address, temp_config, write_chunk, InMemoryChain, CHAIN};

    const GENESIS_TS: u64 = 1_438_269_973;

    fn write_allocs(config: &index_runtime::IndexConfig, bytes: &[u8]) {
        let path = config.paths().allocs_path(CHAIN);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn allocs() -> String {
        format!(
            "address,balance\n{},200\n{},100\n{},300\n",
            address(0xa1).to_hex(),
            address(0xa2).to_hex(),
            address(0xa3).to_hex()
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_bootstrap_then_refresh_monitor() {
        let (_dir, config) = temp_config();
        write_allocs(&config, allocs().as_bytes());
        let runtime = IndexRuntime::new(config.clone()).unwrap();
        let chain: Arc<dyn ChainReader> = Arc::new(InMemoryChain::linear(10, GENESIS_TS));

        let report = runtime.bootstrap(chain.clone()).await.unwrap();
        assert_eq!(report.state, BootstrapState::Pinned);
        assert!(report.chunk_written);
        assert!(runtime.store().chunk_exists(BlockRange::new(0, 0)));

        let timestamps = FileTimestampStore::new(config.paths());
        assert_eq!(
            timestamps.get(CHAIN, 0).await.unwrap(),
            Some(TimestampRecord {
                block_number: 0,
                timestamp: GENESIS_TS as u32
            })
        );

        let watched = address(0xa2);
        write_chunk(runtime.store(), BlockRange::new(1, 9), &[(watched, 4, 1)]);
        Monitor::open(&config.paths(), CHAIN, watched, true, false).unwrap();

        let refresh = runtime.refresh_monitors().await;
        assert_eq!(refresh.promoted, 1);
        assert_eq!(refresh.appended, 2);

        let mut monitor = Monitor::open(&config.paths(), CHAIN, watched, false, false).unwrap();
        assert_eq!(
            monitor.read_all().unwrap(),
            vec![AppearanceRecord::new(0, 1), AppearanceRecord::new(4, 1)]
        );
        assert_eq!(monitor.read_header().unwrap().last_scanned, 9);

        let again = runtime.bootstrap(chain).await.unwrap();
        assert_eq!(again.initial, BootstrapState::Pinned);
        assert!(!again.chunk_written);

        let audit = runtime.verify_chunks().unwrap();
        assert_eq!(audit.verified, 2);
        assert!(audit.is_clean());
    }

    #[tokio::test]
    async fn test_missing_allocations_is_fatal() {
        let (_dir, config) = temp_config();
        let runtime = IndexRuntime::new(config).unwrap();
        let chain: Arc<dyn ChainReader> = Arc::new(InMemoryChain::linear(2, GENESIS_TS));

        assert!(matches!(
            runtime.bootstrap(chain).await,
            Err(BootstrapError::Genesis(_))
        ));
        assert!(!runtime.store().chunk_exists(BlockRange::new(0, 0)));
    }

    #[tokio::test]
    async fn test_zero_genesis_timestamp_uses_block_one() {
        let (_dir, config) = temp_config();
        write_allocs(&config, allocs().as_bytes());
        let runtime = IndexRuntime::new(config.clone()).unwrap();

        let mut reader = InMemoryChain::linear(3, 2_000);
        if let Some(header) = reader.headers.get_mut(&0) {
            header.timestamp = 0;
        }
        let report = runtime.bootstrap(Arc::new(reader)).await.unwrap();
        // block 1 is stamped 2_013
        assert_eq!(report.timestamp, Some(2_000));
    }
}

//! # Decache Flow
//!
//! Textual identifiers resolve to cache files under the chain's cache
//! folder, which are removed in ascending block order.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use index_runtime::IndexRuntime;
    use ix_03_decache::{DecacheError, DecacheMode, Identifier, Location, TxPosition};
    use shared_types::ChainReadError;

    use crate::fixtures::{temp_config, InMemoryChain, CHAIN};

    fn touch(root: &Path, location: Location, body: &[u8]) -> PathBuf {
        let path = root.join(location.cache_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_full_decache_of_block_and_hash() {
        let (_dir, config) = temp_config();
        let root = config.paths().chain_cache(CHAIN, false);
        let runtime = IndexRuntime::new(config).unwrap();
        let chain = InMemoryChain::linear(10, 1_000).with_transaction([9u8; 32], 5, 1);

        // block 5 has two transactions, block 4 has one
        let block = touch(&root, Location::LightBlock(5), b"header");
        let receipts = touch(&root, Location::ReceiptGroup(5, TxPosition::NoPosition), b"r");
        let trace = touch(&root, Location::TraceGroup(5, TxPosition::Index(1)), b"tt");
        let untouched = touch(&root, Location::LightBlock(6), b"keep");

        let ids: Vec<Identifier> = ["4", "0x0909090909090909090909090909090909090909090909090909090909090909"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let report = runtime.decache(&chain, &ids, DecacheMode::Full).await.unwrap();

        assert_eq!(report.locations, 4 + 6);
        assert_eq!(report.removed, 3);
        assert_eq!(report.bytes_freed, 6 + 1 + 2);
        assert!(!block.exists());
        assert!(!receipts.exists());
        assert!(!trace.exists());
        assert!(untouched.exists());
    }

    #[tokio::test]
    async fn test_logs_only_range() {
        let (_dir, config) = temp_config();
        let root = config.paths().chain_cache(CHAIN, false);
        let runtime = IndexRuntime::new(config).unwrap();
        let chain = InMemoryChain::linear(10, 1_000);

        let logs: Vec<PathBuf> = (2..5)
            .map(|n| touch(&root, Location::LogGroup(n, TxPosition::NoPosition), b"l"))
            .collect();
        let header = touch(&root, Location::LightBlock(3), b"h");

        let ids = vec!["2-5".parse::<Identifier>().unwrap()];
        let mode = DecacheMode::from_flags(true, true);
        let report = runtime.decache(&chain, &ids, mode).await.unwrap();

        assert_eq!(report.removed, 3);
        assert!(logs.iter().all(|p| !p.exists()));
        assert!(header.exists());
    }

    #[tokio::test]
    async fn test_unknown_hash_aborts() {
        let (_dir, config) = temp_config();
        let runtime = IndexRuntime::new(config).unwrap();
        let chain = InMemoryChain::linear(3, 1_000);

        let ids = vec![Identifier::TransactionHash([1u8; 32])];
        let err = runtime
            .decache(&chain, &ids, DecacheMode::Full)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DecacheError::Chain(ChainReadError::TransactionNotFound(_))
        ));
    }
}

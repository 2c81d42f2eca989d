//! # Index Runtime
//!
//! Owns the chunk store and monitor directory of one chain and exposes the
//! maintenance passes the binary runs.

use std::path::PathBuf;
use std::sync::Arc;

use index_telemetry::chain_span;
use ix_01_chunk_index::{ChunkError, RangeChunkStore};
use ix_02_address_monitors::{Monitor, MonitorDirectory, MonitorError, MonitorScanner};
use ix_03_decache::{DecacheError, DecacheMode, DecacheReport, FsCacheEvictor, Identifier};
use serde::Serialize;
use shared_types::{paths::STAGING_FOLDER, ChainReader, IndexPaths};
use tracing::{info, warn, Instrument};

use crate::adapters::{CsvGenesisSource, FileTimestampStore, LoggingPinHook};
use crate::bootstrap::{BootstrapBuilder, BootstrapReport};
use crate::config::IndexConfig;
use crate::error::BootstrapError;

/// Folder, relative to the chain's cache folder, holding production monitors.
pub const MONITORS_FOLDER: &str = "monitors";

/// Outcome of a monitor refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub monitors: usize,
    pub appended: usize,
    pub duplicates: u32,
    pub promoted: usize,
    pub failures: Vec<(String, String)>,
}

/// Outcome of a chunk verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkAudit {
    pub verified: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl ChunkAudit {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runtime for one chain.
pub struct IndexRuntime {
    config: IndexConfig,
    paths: IndexPaths,
    store: RangeChunkStore,
    monitors: MonitorDirectory,
}

impl IndexRuntime {
    pub fn new(config: IndexConfig) -> Result<Self, ChunkError> {
        let paths = config.paths();
        let store = RangeChunkStore::new(paths.clone(), &config.chain, config.chunk.clone())?;
        let monitors = MonitorDirectory::new(paths.clone(), &config.chain)
            .with_override_file(&config.override_file)
            .with_test_mode(config.test_mode)
            .with_magic_check(config.magic_check)
            .with_queue_capacity(config.queue_capacity);
        Ok(Self {
            config,
            paths,
            store,
            monitors,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn store(&self) -> &RangeChunkStore {
        &self.store
    }

    pub fn monitors(&self) -> &MonitorDirectory {
        &self.monitors
    }

    /// Bootstrap builder wired to the file-backed collaborators.
    pub fn bootstrapper(&self, reader: Arc<dyn ChainReader>) -> BootstrapBuilder {
        BootstrapBuilder::new(
            self.paths.clone(),
            self.store.clone(),
            reader,
            Arc::new(CsvGenesisSource::new(self.paths.clone())),
            Arc::new(FileTimestampStore::new(self.paths.clone())),
            Arc::new(LoggingPinHook::new()),
        )
    }

    /// Ensure the block-zero chunk exists.
    pub async fn bootstrap(
        &self,
        reader: Arc<dyn ChainReader>,
    ) -> Result<BootstrapReport, BootstrapError> {
        self.bootstrapper(reader).run().await
    }

    /// Freshen every monitor from the chunk index.
    ///
    /// Each monitor is staged, freshened, cleaned and promoted. A failing
    /// monitor is recorded and the pass moves on; its staged copy stays
    /// behind for the next pass.
    pub async fn refresh_monitors(&self) -> RefreshReport {
        let span = chain_span!("refresh_monitors", self.config.chain);
        self.refresh_all().instrument(span).await
    }

    async fn refresh_all(&self) -> RefreshReport {
        let scanner = MonitorScanner::new(&self.store);
        let mut report = RefreshReport::default();
        let mut rx = self.monitors.list_monitors(MONITORS_FOLDER);

        // Promotion renames into the folder being listed, so drain first.
        let mut listed = Vec::new();
        while let Some(item) = rx.recv().await {
            listed.push(item);
        }

        for item in listed {
            let production = match item {
                Ok(monitor) => monitor,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable monitor entry");
                    report.failures.push((String::new(), e.to_string()));
                    continue;
                }
            };
            report.monitors += 1;
            let address = production.address();
            match self.refresh_one(&scanner, production) {
                Ok((appended, dups)) => {
                    report.appended += appended;
                    report.duplicates += dups;
                    report.promoted += 1;
                }
                Err(e) => {
                    warn!(address = %address, error = %e, "Monitor refresh failed");
                    report.failures.push((address.to_hex(), e.to_string()));
                }
            }
        }

        info!(
            monitors = report.monitors,
            appended = report.appended,
            promoted = report.promoted,
            failed = report.failures.len(),
            "Monitor refresh complete"
        );
        report
    }

    fn refresh_one(
        &self,
        scanner: &MonitorScanner<'_, RangeChunkStore>,
        production: Monitor,
    ) -> Result<(usize, u32), MonitorError> {
        let mut staged = Monitor::open_staged(
            &self.paths,
            &self.config.chain,
            production.address(),
            self.config.test_mode,
        )?
        .with_magic_check(self.config.magic_check);
        let freshened = scanner.freshen(&mut staged)?;
        let cleaned = staged.clean()?;
        staged.move_to_production()?;
        Ok((freshened.appended, cleaned.dups))
    }

    /// Recompute every chunk's content hash against its header. Chunks
    /// whose header cannot be read count as failures.
    pub fn verify_chunks(&self) -> Result<ChunkAudit, ChunkError> {
        let listing = self.store.scan_chunks()?;
        let mut audit = ChunkAudit::default();
        for (path, e) in listing.unreadable {
            audit.failures.push((path, e.to_string()));
        }
        for chunk in listing.chunks {
            match self.store.verify(&chunk.path) {
                Ok(_) => audit.verified += 1,
                Err(e) => {
                    warn!(chunk = %chunk.path.display(), error = %e, "Chunk failed verification");
                    audit.failures.push((chunk.path, e.to_string()));
                }
            }
        }
        info!(
            chain = %self.config.chain,
            verified = audit.verified,
            failed = audit.failures.len(),
            "Chunk verification complete"
        );
        Ok(audit)
    }

    /// Staged monitors left behind by an interrupted refresh.
    pub fn stranded_monitors(&self) -> Result<Vec<Monitor>, MonitorError> {
        let folder = format!("{}/{}", MONITORS_FOLDER, STAGING_FOLDER);
        let stranded = self.monitors.collect(&folder)?;
        if !stranded.is_empty() {
            warn!(count = stranded.len(), "Found staged monitors from an earlier run");
        }
        Ok(stranded)
    }

    /// Evict cached chain data for `ids`.
    pub async fn decache<R>(
        &self,
        reader: &R,
        ids: &[Identifier],
        mode: DecacheMode,
    ) -> Result<DecacheReport, DecacheError>
    where
        R: ChainReader + ?Sized,
    {
        let root = self
            .paths
            .chain_cache(&self.config.chain, self.config.test_mode);
        let evictor = FsCacheEvictor::new(root);
        ix_03_decache::decache(reader, &evictor, ids, mode).await
    }
}

//! Monitor freshening
//!
//! Brings a staged monitor up to date with the chunk index: every chunk
//! ending after the monitor's `last_scanned` block is bloom-tested for the
//! address, hits are confirmed against the chunk's table, and new records
//! are appended.

use serde::Serialize;
use shared_types::{Address, AppearanceRecord};
use tracing::{debug, info};

use ix_01_chunk_index::ChunkIndexApi;

use super::monitor::Monitor;
use crate::error::MonitorError;

/// Outcome of one freshen pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshenReport {
    pub address: Address,
    pub chunks_scanned: usize,
    pub appended: usize,
    pub last_scanned: u32,
}

/// Scans the chunk index on behalf of monitors.
pub struct MonitorScanner<'a, I: ChunkIndexApi + ?Sized> {
    index: &'a I,
}

impl<'a, I: ChunkIndexApi + ?Sized> MonitorScanner<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Append every appearance of the monitor's address that the index
    /// holds beyond what the monitor already records.
    ///
    /// A monitor with `last_scanned == 0` has never been scanned and sees
    /// every chunk. Records are only appended when they sort after the
    /// monitor's current last record, so repeated passes are idempotent.
    pub fn freshen(&self, monitor: &mut Monitor) -> Result<FreshenReport, MonitorError> {
        let address = monitor.address();
        let header = if monitor.file_size()? > 0 {
            monitor.read_header()?
        } else {
            monitor.cached_header()
        };
        let last_scanned = header.last_scanned as u64;
        let tail = match monitor.count()? {
            0 => None,
            n => Some(monitor.read_appearance_at(n)?),
        };

        let chunks: Vec<_> = self
            .index
            .list_chunks()?
            .into_iter()
            .filter(|c| last_scanned == 0 || c.range.end > last_scanned)
            .collect();

        if chunks.is_empty() {
            debug!(address = %address, last_scanned, "Monitor already fresh");
            return Ok(FreshenReport {
                address,
                chunks_scanned: 0,
                appended: 0,
                last_scanned: header.last_scanned,
            });
        }

        let mut found: Vec<AppearanceRecord> = Vec::new();
        let mut highest = last_scanned;
        for chunk in &chunks {
            found.extend(self.index.appearances_for(&chunk.path, &address)?);
            highest = highest.max(chunk.range.end);
        }
        found.sort_unstable();
        found.dedup();
        found.retain(|r| tail.map_or(true, |t| *r > t));

        let new_last_scanned = highest.min(u32::MAX as u64) as u32;
        monitor.append_records(new_last_scanned, &found)?;

        info!(
            address = %address,
            chunks = chunks.len(),
            appended = found.len(),
            last_scanned = new_last_scanned,
            "Freshened monitor"
        );
        Ok(FreshenReport {
            address,
            chunks_scanned: chunks.len(),
            appended: found.len(),
            last_scanned: new_last_scanned,
        })
    }
}

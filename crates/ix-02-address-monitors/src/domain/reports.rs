//! Serializable summaries returned by monitor operations

use serde::Serialize;
use shared_types::Address;

/// Snapshot of one monitor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSummary {
    pub address: Address,
    pub n_records: u32,
    pub file_size: u64,
    pub last_scanned: u32,
    pub deleted: bool,
}

/// Outcome of sorting and de-duplicating a staged monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorCleanReport {
    pub address: Address,
    pub dups: u32,
    pub size_then: u64,
    pub size_now: u64,
}

//! Inbound Ports (Driving Ports)

use std::path::Path;

use shared_types::{Address, AppearanceRecord};

use crate::error::ChunkError;
use crate::service::ChunkInfo;

/// Read access to finalized chunks (Driving Port)
///
/// Implemented by [`crate::RangeChunkStore`]; monitor scanning only depends
/// on this trait so it can be driven by an in-memory index in tests.
pub trait ChunkIndexApi: Send + Sync {
    /// All finalized chunks, ordered by range start.
    fn list_chunks(&self) -> Result<Vec<ChunkInfo>, ChunkError>;

    /// Records for `address` in the chunk at `chunk`.
    ///
    /// The chunk's bloom filter is consulted first; an empty result is
    /// returned without touching the address table when it says no.
    fn appearances_for(
        &self,
        chunk: &Path,
        address: &Address,
    ) -> Result<Vec<AppearanceRecord>, ChunkError>;
}

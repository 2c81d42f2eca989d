//! Filesystem cache evictor

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::trace;

use crate::domain::Location;
use crate::error::DecacheError;
use crate::ports::{CacheEvictor, EvictOutcome};

/// Deletes `<root>/<location.cache_path()>`.
#[derive(Debug, Clone)]
pub struct FsCacheEvictor {
    root: PathBuf,
}

impl FsCacheEvictor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl CacheEvictor for FsCacheEvictor {
    async fn evict(&self, location: &Location) -> Result<EvictOutcome, DecacheError> {
        let path = self.root.join(location.cache_path());
        let bytes = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(EvictOutcome::Missing),
            Err(e) => return Err(e.into()),
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                trace!(location = %location, "Evicted cache entry");
                Ok(EvictOutcome::Removed { bytes })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(EvictOutcome::Missing),
            Err(e) => Err(e.into()),
        }
    }
}

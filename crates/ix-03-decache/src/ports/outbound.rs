//! Outbound Ports (Driven Ports)

use async_trait::async_trait;

use crate::domain::Location;
use crate::error::DecacheError;

/// Result of evicting one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictOutcome {
    Removed { bytes: u64 },
    Missing,
}

/// Removes cached artifacts (Driven Port).
///
/// Locations are handed over in resolution order; implementations must
/// apply them in that order.
#[async_trait]
pub trait CacheEvictor: Send + Sync {
    async fn evict(&self, location: &Location) -> Result<EvictOutcome, DecacheError>;
}

//! Location resolver

use std::collections::BTreeSet;

use serde::Serialize;
use shared_types::{BlockNumber, ChainReader};
use tracing::{debug, info};

use crate::domain::{DecacheMode, Identifier, Location, TxPosition};
use crate::error::DecacheError;
use crate::ports::{CacheEvictor, EvictOutcome};

/// Outcome of a decache pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecacheReport {
    pub locations: usize,
    pub removed: usize,
    pub missing: usize,
    pub bytes_freed: u64,
}

async fn resolve_blocks<R>(reader: &R, ids: &[Identifier]) -> Result<BTreeSet<BlockNumber>, DecacheError>
where
    R: ChainReader + ?Sized,
{
    let mut blocks = BTreeSet::new();
    for id in ids {
        match *id {
            Identifier::Block(n) => {
                blocks.insert(n);
            }
            Identifier::BlockRange { start, end } => {
                if end < start {
                    return Err(DecacheError::InvalidRange { start, end });
                }
                blocks.extend(start..end);
            }
            Identifier::Transaction { block, .. } => {
                blocks.insert(block);
            }
            Identifier::TransactionHash(hash) => {
                let (block, _) = reader.transaction_location(&hash).await?;
                blocks.insert(block);
            }
            Identifier::Latest => {
                blocks.insert(reader.latest_block().await?);
            }
        }
    }
    Ok(blocks)
}

/// Resolve `ids` into cache locations, in eviction order.
///
/// A header fetch failure aborts the whole resolution.
pub async fn resolve_locations<R>(
    reader: &R,
    ids: &[Identifier],
    mode: DecacheMode,
) -> Result<Vec<Location>, DecacheError>
where
    R: ChainReader + ?Sized,
{
    let blocks = resolve_blocks(reader, ids).await?;
    let mut locations = Vec::new();

    for bn in blocks {
        match mode {
            DecacheMode::LogsOnly => locations.push(Location::LogGroup(bn, TxPosition::NoPosition)),
            DecacheMode::TracesOnly => {
                locations.push(Location::TraceGroup(bn, TxPosition::NoPosition))
            }
            DecacheMode::Full => {
                let header = reader.block_header(bn).await?;
                locations.push(Location::LightBlock(bn));
                locations.push(Location::ReceiptGroup(bn, TxPosition::NoPosition));
                for index in 0..header.transaction_count {
                    locations.push(Location::Transaction(bn, TxPosition::Index(index)));
                    locations.push(Location::TraceGroup(bn, TxPosition::Index(index)));
                }
            }
        }
    }

    debug!(ids = ids.len(), locations = locations.len(), ?mode, "Resolved cache locations");
    Ok(locations)
}

/// Resolve `ids` and evict every resulting location in order.
pub async fn decache<R, E>(
    reader: &R,
    evictor: &E,
    ids: &[Identifier],
    mode: DecacheMode,
) -> Result<DecacheReport, DecacheError>
where
    R: ChainReader + ?Sized,
    E: CacheEvictor + ?Sized,
{
    let locations = resolve_locations(reader, ids, mode).await?;
    let mut report = DecacheReport {
        locations: locations.len(),
        ..DecacheReport::default()
    };
    for location in &locations {
        match evictor.evict(location).await? {
            EvictOutcome::Removed { bytes } => {
                report.removed += 1;
                report.bytes_freed += bytes;
            }
            EvictOutcome::Missing => report.missing += 1,
        }
    }
    info!(
        locations = report.locations,
        removed = report.removed,
        missing = report.missing,
        bytes = report.bytes_freed,
        "Decache complete"
    );
    Ok(report)
}

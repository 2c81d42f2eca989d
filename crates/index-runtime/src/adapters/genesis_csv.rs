//! Genesis allocations from `<config-root>/<chain>/allocs.csv`
//!
//! `address,balance` per line, `#` comments, optional `address,...` header.

use async_trait::async_trait;
use shared_types::{Address, IndexPaths};
use tracing::debug;

use crate::error::BootstrapError;
use crate::ports::{GenesisAllocation, GenesisSource};

#[derive(Debug, Clone)]
pub struct CsvGenesisSource {
    paths: IndexPaths,
}

impl CsvGenesisSource {
    pub fn new(paths: IndexPaths) -> Self {
        Self { paths }
    }
}

/// Parse an allocation list. Any malformed row fails the whole load so the
/// allocation indices stay meaningful.
pub fn parse_allocations(bytes: &[u8]) -> Result<Vec<GenesisAllocation>, BootstrapError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut allocations = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| BootstrapError::Genesis(e.to_string()))?;
        let field = record.get(0).unwrap_or("");
        if i == 0 && field.eq_ignore_ascii_case("address") {
            continue;
        }
        let address = Address::parse(field).map_err(|e| {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            BootstrapError::Genesis(format!("line {}: {}", line, e))
        })?;
        allocations.push(GenesisAllocation {
            address,
            balance: record.get(1).unwrap_or("0").to_string(),
        });
    }
    Ok(allocations)
}

#[async_trait]
impl GenesisSource for CsvGenesisSource {
    async fn allocations(&self, chain: &str) -> Result<Vec<GenesisAllocation>, BootstrapError> {
        let path = self.paths.allocs_path(chain);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| BootstrapError::Genesis(format!("{}: {}", path.display(), e)))?;
        let allocations = parse_allocations(&bytes)?;
        debug!(chain, count = allocations.len(), "Loaded genesis allocations");
        Ok(allocations)
    }
}

//! # Appearance Index Runtime
//!
//! Runs the maintenance passes for one chain:
//!
//! 1. Load configuration from `IX_*` variables
//! 2. Verify every finalized chunk against its content hash
//! 3. Report staged monitors stranded by an interrupted run
//! 4. Freshen, clean and promote every monitor
//!
//! Bootstrapping the block-zero chunk and decaching need a chain reader and
//! are driven through the library.

use anyhow::{Context, Result};
use index_runtime::{IndexConfig, IndexRuntime};
use index_telemetry::{init_logging, TelemetryConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env())?;

    let config = IndexConfig::from_env();
    config.validate().context("invalid index configuration")?;
    info!(
        chain = %config.chain,
        cache = %config.cache_root.display(),
        index = %config.index_root.display(),
        test_mode = config.test_mode,
        "Starting appearance index maintenance"
    );

    let runtime = IndexRuntime::new(config).context("failed to open chunk store")?;

    let audit = runtime.verify_chunks().context("failed to list chunks")?;
    if !audit.is_clean() {
        for (path, reason) in &audit.failures {
            error!(chunk = %path.display(), %reason, "Corrupt chunk");
        }
    }

    match runtime.stranded_monitors() {
        Ok(stranded) => {
            for monitor in &stranded {
                warn!(address = %monitor.address(), "Staged monitor will be re-freshened");
            }
        }
        Err(e) => warn!(error = %e, "Could not list staged monitors"),
    }

    let report = runtime.refresh_monitors().await;
    info!(
        monitors = report.monitors,
        appended = report.appended,
        failed = report.failures.len(),
        "Maintenance complete"
    );

    if !audit.is_clean() || !report.failures.is_empty() {
        anyhow::bail!(
            "{} corrupt chunks, {} failed monitors",
            audit.failures.len(),
            report.failures.len()
        );
    }
    Ok(())
}

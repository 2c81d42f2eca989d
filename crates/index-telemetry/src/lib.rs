//! # Index Telemetry
//!
//! Structured logging for the appearance index.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use index_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     tracing::info!(chain = "mainnet", "index starting");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` / `IX_LOG_LEVEL` | `info` | Log level filter |
//! | `IX_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `IX_SERVICE_NAME` | `appearance-index` | Service name attached to logs |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    Init(String),

    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
}

/// Convenience macro for creating a span tagged with a chain name.
///
/// ```rust,ignore
/// let _span = chain_span!("freshen", "mainnet", monitors = 12).entered();
/// ```
#[macro_export]
macro_rules! chain_span {
    ($name:expr, $chain:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name, chain = %$chain $(, $($field)*)?)
    };
}

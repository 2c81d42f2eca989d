//! # Index Runtime Library
//!
//! Wires the chunk store, the address monitors and the cache invalidator of
//! one chain together. The `index-runtime` binary is a thin shell over
//! [`IndexRuntime`].
//!
//! ## Modules
//!
//! - `config/` - `IX_*` environment configuration
//! - `bootstrap/` - block-zero chunk state machine
//! - `adapters/` - file-backed genesis, timestamp and pin collaborators
//! - `runtime` - maintenance passes (refresh, verify, decache)

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod ports;
pub mod runtime;

pub use bootstrap::{BootstrapBuilder, BootstrapReport, BootstrapState};
pub use config::{ConfigError, IndexConfig};
pub use error::BootstrapError;
pub use ports::{GenesisAllocation, GenesisSource, PinHook, TimestampRecord, TimestampStore};
pub use runtime::{ChunkAudit, IndexRuntime, RefreshReport, MONITORS_FOLDER};

//! # IX-02 Address Monitors
//!
//! One binary log per watched address, listing every `(block, tx)` where the
//! address appeared.
//!
//! ## File Layout
//!
//! ```text
//! slot 0      [magic u16][unused u8][deleted u8][last_scanned u32]
//! slot i >= 1 [block u32][tx u32]
//! ```
//!
//! Every slot is 8 bytes, so `count = file_size / 8 - 1`.
//!
//! ## Lifecycle
//!
//! The scraper writes only to the *staged* copy
//! (`monitors/staging/<addr>.mon.bin`). Readers only see the *production*
//! copy. [`Monitor::move_to_production`] publishes with a single rename.
//!
//! ## Architecture
//!
//! - `domain/`: header codec, report types
//! - `service/`: [`Monitor`] file operations and [`MonitorScanner`]
//! - `adapters/`: [`MonitorDirectory`] enumeration (override list or folder)

pub mod adapters;
pub mod domain;
pub mod error;
pub mod service;

pub use adapters::{MonitorDirectory, DEFAULT_OVERRIDE_FILE};
pub use domain::{
    MagicCheck, MonitorCleanReport, MonitorHeader, MonitorSummary, MONITOR_MAGIC,
};
pub use error::MonitorError;
pub use service::{FreshenReport, Monitor, MonitorScanner};

//! Service Layer
//!
//! - [`Monitor`]: operations on one monitor file
//! - [`MonitorScanner`]: appends new appearances found in the chunk index

pub mod monitor;
pub mod scanner;

pub use monitor::Monitor;
pub use scanner::{FreshenReport, MonitorScanner};

//! Domain Layer - monitor header codec and report types

pub mod header;
pub mod reports;

pub use header::{MagicCheck, MonitorHeader, MONITOR_MAGIC};
pub use reports::{MonitorCleanReport, MonitorSummary};

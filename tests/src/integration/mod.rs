//! # Integration Flows
//!
//! - `monitor_lifecycle` - staging, promotion and enumeration of monitors
//! - `bootstrap_flow` - block-zero chunk through to a freshened monitor
//! - `decache_flow` - identifier parsing through to evicted cache files

pub mod bootstrap_flow;
pub mod decache_flow;
pub mod monitor_lifecycle;

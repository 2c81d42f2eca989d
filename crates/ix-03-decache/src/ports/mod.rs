//! Ports Layer
//!
//! - Driven Ports (outbound): where resolved locations get evicted

pub mod outbound;

pub use outbound::{CacheEvictor, EvictOutcome};

//! Ports Layer
//!
//! - Driving Ports (inbound): the read side of the chunk store, consumed by
//!   monitor scanning

pub mod inbound;

pub use inbound::ChunkIndexApi;

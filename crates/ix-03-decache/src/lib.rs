//! # IX-03 Decache
//!
//! Resolves block and transaction identifiers into the cache [`Location`]s
//! derived from them, in eviction order, and removes those entries.
//!
//! ## Emission Order
//!
//! Blocks are processed ascending and de-duplicated. Within a block, group
//! entries precede the per-transaction entries they summarize:
//!
//! ```text
//! LightBlock(n)
//! ReceiptGroup(n, NOPOSN)
//! Transaction(n, 0)  TraceGroup(n, 0)
//! Transaction(n, 1)  TraceGroup(n, 1)
//! ...
//! ```
//!
//! In logs-only or traces-only mode each block yields a single group entry.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::FsCacheEvictor;
pub use domain::{DecacheMode, Identifier, Location, TxPosition};
pub use error::DecacheError;
pub use ports::{CacheEvictor, EvictOutcome};
pub use service::{decache, resolve_locations, DecacheReport};

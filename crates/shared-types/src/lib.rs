//! # Shared Types Crate
//!
//! Primitives shared by every component of the appearance index.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: addresses, appearance records and the path
//!   layout are defined once and reused by the chunk store, the monitors and
//!   the runtime.
//! - **Normalized Keys**: an [`Address`] is a fixed 20-byte value; its string
//!   form is always lowercase `0x`-prefixed hex. Nothing compares addresses
//!   case-insensitively.
//! - **Equal-Width Records**: every binary slot in the index is
//!   [`RECORD_WIDTH`] bytes wide (appearances, monitor headers, timestamps).

pub mod chain;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod paths;

pub use chain::{ChainReader, LightBlockHeader};
pub use codec::{AppearanceRecord, RECORD_WIDTH};
pub use entities::*;
pub use errors::*;
pub use paths::{IndexPaths, BlockRange};

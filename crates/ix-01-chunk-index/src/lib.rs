//! # IX-01 Chunk Index
//!
//! Block-range-partitioned, content-addressed store of address appearances.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: membership test written into every chunk
//!   - `AddressAppearanceMap`: the unit of data written into a chunk
//!   - `ChunkHeader`: fixed-width header codec
//!   - `ChunkConfig`: bloom sizing
//!
//! - **Ports Layer** (`ports/`): `ChunkIndexApi`, the read side consumed by
//!   monitor scanning
//!
//! - **Service Layer** (`service/`): `RangeChunkStore` reads and writes chunk
//!   files; `ChunkReader` answers per-address lookups on one chunk
//!
//! - **Adapters Layer** (`adapters/`): scratch-folder maintenance
//!
//! ## Chunk Layout
//!
//! ```text
//! [magic u32][content_hash 32][address_count u64][appearance_count u64]
//! [bloom_len u32][bloom bytes]
//! address_count    x [address 20][offset u32][count u32]   sorted by address
//! appearance_count x [block u32][tx u32]
//! ```
//!
//! All integers little-endian. `content_hash` is Keccak-256 of everything
//! after the header.
//!
//! ## Invariants
//!
//! - Bloom lookups never produce false negatives; positives are confirmed
//!   against the address table.
//! - Chunks are immutable. A range is written once, or replaced wholesale
//!   through a temp file and a rename.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{clean_temporary_folders, CleanReport};
pub use domain::{
    AddressAppearanceMap, BloomFilter, ChunkConfig, ChunkHeader, CHUNK_HEADER_WIDTH, CHUNK_MAGIC,
};
pub use error::ChunkError;
pub use ports::ChunkIndexApi;
pub use service::{
    range_from_filename, read_chunk_header, ChunkInfo, ChunkListing, ChunkReader, RangeChunkStore,
};

//! Domain Layer - Pure chunk logic
//!
//! RULES:
//! - No I/O operations
//! - Pure functions where possible

pub mod appearance_map;
pub mod bloom_filter;
pub mod chunk_header;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use appearance_map::AddressAppearanceMap;
pub use bloom_filter::BloomFilter;
pub use chunk_header::{
    ChunkHeader, ADDRESS_ENTRY_WIDTH, CHUNK_HEADER_WIDTH, CHUNK_MAGIC,
};
pub use config::ChunkConfig;
pub use parameters::{estimated_fpr, FilterSizing};

//! Service Layer
//!
//! Chunk reading and writing over the on-disk layout.

pub mod chunk_store;

pub use chunk_store::{
    range_from_filename, read_chunk_header, ChunkInfo, ChunkListing, ChunkReader, RangeChunkStore,
};

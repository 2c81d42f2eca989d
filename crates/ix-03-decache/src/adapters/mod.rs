//! Adapters Layer
//!
//! - `FsCacheEvictor` - deletes cache files below a chain's cache folder

pub mod fs_evictor;

pub use fs_evictor::FsCacheEvictor;

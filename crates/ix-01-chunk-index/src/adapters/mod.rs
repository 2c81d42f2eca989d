//! Adapters Layer
//!
//! - `clean_temporary_folders` - wipes the scraper's scratch folders

pub mod temp_folders;

pub use temp_folders::{clean_temporary_folders, CleanReport};

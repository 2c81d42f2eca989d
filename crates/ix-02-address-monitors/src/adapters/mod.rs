//! Adapters Layer
//!
//! - [`MonitorDirectory`]: produces monitors from the override address list
//!   or from the files in a monitor folder

pub mod directory;

pub use directory::{MonitorDirectory, DEFAULT_OVERRIDE_FILE};

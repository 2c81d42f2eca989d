//! # Bootstrap
//!
//! Guarantees a block-zero chunk exists before scraping starts.
//!
//! ## Sequence
//!
//! ```text
//! NotStarted ──write chunk──→ ChunkWritten ──write ts──→ TimestampWritten ──pin──→ Pinned
//! ```
//!
//! The state is persisted to `<index-root>/<chain>/bootstrap.json` after
//! every transition. On restart it is re-derived from that file and from
//! whether the block-zero chunk exists, so a crash between steps resumes at
//! the step that did not complete.

pub mod builder;
pub mod state;

pub use builder::{BootstrapBuilder, BootstrapReport};
pub use state::{BootstrapState, BootstrapStateFile};

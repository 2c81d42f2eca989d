//! # Appearance Index Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Chunk write, lookup and bloom throughput
//! └── src/
//!     ├── fixtures.rs   # In-memory chain reader, chunk helpers
//!     └── integration/  # Cross-crate flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ix-tests
//! cargo test -p ix-tests integration::monitor_lifecycle
//! cargo bench -p ix-tests
//! ```

#![allow(unused_variables)]
#![allow(dead_code)]

pub mod fixtures;
pub mod integration;

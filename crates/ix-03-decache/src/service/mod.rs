//! Service Layer
//!
//! Location resolution and eviction.

pub mod resolver;

pub use resolver::{decache, resolve_locations, DecacheReport};

//! Domain Layer - identifiers, modes and cache locations

pub mod identifier;
pub mod location;

pub use identifier::{DecacheMode, Identifier};
pub use location::{Location, TxPosition};

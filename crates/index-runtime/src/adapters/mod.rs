//! # Adapters
//!
//! File-backed implementations of the collaborator ports, plus the
//! bootstrap lock.

pub mod genesis_csv;
pub mod lock;
pub mod pin;
pub mod timestamps;

pub use genesis_csv::CsvGenesisSource;
pub use lock::BootstrapLock;
pub use pin::LoggingPinHook;
pub use timestamps::FileTimestampStore;

//! Cache locations
//!
//! Each cached artifact lives at
//! `<kind>/<aaa>/<bbb>/<ccc>/<block9>[-<tx5>].bin` under the chain's cache
//! folder, where `aaabbbccc` is the zero-padded block number.

use std::fmt;
use std::path::PathBuf;

use shared_types::{BlockNumber, TxIndex};

/// Transaction position within a block, or none for block-level groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxPosition {
    Index(TxIndex),
    NoPosition,
}

impl fmt::Display for TxPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxPosition::Index(i) => write!(f, "{}", i),
            TxPosition::NoPosition => f.write_str("NOPOSN"),
        }
    }
}

/// One invalidatable cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    LightBlock(BlockNumber),
    ReceiptGroup(BlockNumber, TxPosition),
    Transaction(BlockNumber, TxPosition),
    TraceGroup(BlockNumber, TxPosition),
    LogGroup(BlockNumber, TxPosition),
}

impl Location {
    pub fn block(&self) -> BlockNumber {
        match *self {
            Location::LightBlock(b)
            | Location::ReceiptGroup(b, _)
            | Location::Transaction(b, _)
            | Location::TraceGroup(b, _)
            | Location::LogGroup(b, _) => b,
        }
    }

    pub fn tx(&self) -> TxPosition {
        match *self {
            Location::LightBlock(_) => TxPosition::NoPosition,
            Location::ReceiptGroup(_, t)
            | Location::Transaction(_, t)
            | Location::TraceGroup(_, t)
            | Location::LogGroup(_, t) => t,
        }
    }

    /// Top-level cache folder for this kind of entry.
    pub fn kind(&self) -> &'static str {
        match self {
            Location::LightBlock(_) => "blocks",
            Location::ReceiptGroup(..) => "receipts",
            Location::Transaction(..) => "transactions",
            Location::TraceGroup(..) => "traces",
            Location::LogGroup(..) => "logs",
        }
    }

    /// Path relative to the chain's cache folder.
    pub fn cache_path(&self) -> PathBuf {
        let padded = format!("{:09}", self.block());
        let file = match self.tx() {
            TxPosition::Index(i) => format!("{}-{:05}.bin", padded, i),
            TxPosition::NoPosition => format!("{}.bin", padded),
        };
        let mut path = PathBuf::from(self.kind());
        if padded.len() == 9 {
            path.push(&padded[0..3]);
            path.push(&padded[3..6]);
            path.push(&padded[6..9]);
        }
        path.push(file);
        path
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::LightBlock(b) => write!(f, "LightBlock({})", b),
            Location::ReceiptGroup(b, t) => write!(f, "ReceiptGroup({},{})", b, t),
            Location::Transaction(b, t) => write!(f, "Transaction({},{})", b, t),
            Location::TraceGroup(b, t) => write!(f, "TraceGroup({},{})", b, t),
            Location::LogGroup(b, t) => write!(f, "LogGroup({},{})", b, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_paths() {
        assert_eq!(
            Location::LightBlock(1_234_567).cache_path(),
            PathBuf::from("blocks/001/234/567/001234567.bin")
        );
        assert_eq!(
            Location::TraceGroup(100, TxPosition::Index(3)).cache_path(),
            PathBuf::from("traces/000/000/100/000000100-00003.bin")
        );
        assert_eq!(
            Location::LogGroup(100, TxPosition::NoPosition).cache_path(),
            PathBuf::from("logs/000/000/100/000000100.bin")
        );
    }

    #[test]
    fn test_display_uses_noposn() {
        assert_eq!(
            Location::ReceiptGroup(7, TxPosition::NoPosition).to_string(),
            "ReceiptGroup(7,NOPOSN)"
        );
        assert_eq!(Location::LightBlock(7).tx(), TxPosition::NoPosition);
    }

    #[test]
    fn test_blocks_past_nine_digits_are_not_sharded() {
        let path = Location::LightBlock(1_000_000_000).cache_path();
        assert_eq!(path, PathBuf::from("blocks/1000000000.bin"));
    }
}

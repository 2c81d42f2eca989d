//! Block and transaction identifiers

use std::str::FromStr;

use shared_types::{BlockNumber, Hash, TxIndex};

use crate::error::DecacheError;

/// What to invalidate. `LogsOnly` wins when both flags are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecacheMode {
    #[default]
    Full,
    LogsOnly,
    TracesOnly,
}

impl DecacheMode {
    pub fn from_flags(logs_only: bool, traces_only: bool) -> Self {
        if logs_only {
            DecacheMode::LogsOnly
        } else if traces_only {
            DecacheMode::TracesOnly
        } else {
            DecacheMode::Full
        }
    }
}

/// A block or transaction reference to resolve into block numbers.
///
/// String forms: `100`, `100-200` (end exclusive), `100.3`, `0x<64 hex>`,
/// `latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier {
    Block(BlockNumber),
    BlockRange { start: BlockNumber, end: BlockNumber },
    Transaction { block: BlockNumber, index: TxIndex },
    TransactionHash(Hash),
    Latest,
}

impl FromStr for Identifier {
    type Err = DecacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DecacheError::InvalidIdentifier(s.to_string());
        let number = |t: &str| t.parse::<u64>().map_err(|_| invalid());

        if s.eq_ignore_ascii_case("latest") {
            return Ok(Identifier::Latest);
        }
        if let Some(digits) = s.strip_prefix("0x") {
            let mut hash = [0u8; 32];
            hex::decode_to_slice(digits, &mut hash).map_err(|_| invalid())?;
            return Ok(Identifier::TransactionHash(hash));
        }
        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (number(start)?, number(end)?);
            if end < start {
                return Err(DecacheError::InvalidRange { start, end });
            }
            return Ok(Identifier::BlockRange { start, end });
        }
        if let Some((block, index)) = s.split_once('.') {
            return Ok(Identifier::Transaction {
                block: number(block)?,
                index: number(index)?,
            });
        }
        Ok(Identifier::Block(number(s)?))
    }
}

//! Monitor header (slot 0)

use serde::{Deserialize, Serialize};
use shared_types::RECORD_WIDTH;

/// Magic number written into every monitor header.
pub const MONITOR_MAGIC: u16 = 0xdead;

/// Whether [`MonitorHeader::magic`] is checked when a header is read.
///
/// Older files may carry other values in the magic slot, so the check is
/// off unless asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagicCheck {
    #[default]
    Permissive,
    Strict,
}

/// `[magic u16][unused u8][deleted u8][last_scanned u32]`, little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorHeader {
    pub magic: u16,
    pub unused: bool,
    pub deleted: bool,
    pub last_scanned: u32,
}

impl Default for MonitorHeader {
    fn default() -> Self {
        Self {
            magic: MONITOR_MAGIC,
            unused: false,
            deleted: false,
            last_scanned: 0,
        }
    }
}

impl MonitorHeader {
    pub fn to_bytes(&self) -> [u8; RECORD_WIDTH] {
        let mut out = [0u8; RECORD_WIDTH];
        out[0..2].copy_from_slice(&self.magic.to_le_bytes());
        out[2] = self.unused as u8;
        out[3] = self.deleted as u8;
        out[4..8].copy_from_slice(&self.last_scanned.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; RECORD_WIDTH]) -> Self {
        Self {
            magic: u16::from_le_bytes([bytes[0], bytes[1]]),
            unused: bytes[2] != 0,
            deleted: bytes[3] != 0,
            last_scanned: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

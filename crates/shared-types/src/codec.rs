//! # Appearance Record Codec
//!
//! Fixed-width little-endian encoding of a `(block, transaction)` pair.
//!
//! Every slot in the index files is [`RECORD_WIDTH`] bytes wide. Monitor
//! headers and timestamp records reuse this width so that slot `i` always
//! starts at byte `i * RECORD_WIDTH`.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

/// Width of one encoded record in bytes.
pub const RECORD_WIDTH: usize = 8;

/// One appearance of an address: the block it appeared in and the
/// transaction id within that block.
///
/// Ordering is `(block_number, transaction_id)` ascending, which is the
/// order records must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AppearanceRecord {
    pub block_number: u32,
    pub transaction_id: u32,
}

impl AppearanceRecord {
    pub const fn new(block_number: u32, transaction_id: u32) -> Self {
        Self {
            block_number,
            transaction_id,
        }
    }

    /// Encode to 8 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_WIDTH] {
        let mut out = [0u8; RECORD_WIDTH];
        out[..4].copy_from_slice(&self.block_number.to_le_bytes());
        out[4..].copy_from_slice(&self.transaction_id.to_le_bytes());
        out
    }

    /// Decode from exactly 8 bytes.
    pub fn from_bytes(bytes: [u8; RECORD_WIDTH]) -> Self {
        Self {
            block_number: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            transaction_id: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Write one record. Short writes surface as `io::Error`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Read one record. A short read surfaces as `UnexpectedEof`.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; RECORD_WIDTH];
        reader.read_exact(&mut buf)?;
        Ok(Self::from_bytes(buf))
    }

    /// Decode a packed run of records.
    ///
    /// Fails with `InvalidData` when the length is not a multiple of the
    /// record width.
    pub fn decode_all(bytes: &[u8]) -> io::Result<Vec<Self>> {
        if bytes.len() % RECORD_WIDTH != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} bytes is not a whole number of {}-byte records",
                    bytes.len(),
                    RECORD_WIDTH
                ),
            ));
        }
        Ok(bytes
            .chunks_exact(RECORD_WIDTH)
            .map(|c| {
                let mut buf = [0u8; RECORD_WIDTH];
                buf.copy_from_slice(c);
                Self::from_bytes(buf)
            })
            .collect())
    }
}

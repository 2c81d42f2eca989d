//! Fixed-width chunk header
//!
//! ```text
//! offset  size  field
//! 0       4     magic (0xdeadbeef)
//! 4       32    content hash (keccak256 of the body)
//! 36      8     address count
//! 44      8     appearance count
//! ```

use serde::{Deserialize, Serialize};
use shared_types::BlockRange;

/// Magic number opening every chunk file.
pub const CHUNK_MAGIC: u32 = 0xdead_beef;

/// Encoded header width in bytes.
pub const CHUNK_HEADER_WIDTH: usize = 4 + 32 + 8 + 8;

/// Width of one address table entry: `[address 20][offset u32][count u32]`.
pub const ADDRESS_ENTRY_WIDTH: usize = 20 + 4 + 4;

/// Decoded chunk header. `range` comes from the file name, not the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkHeader {
    pub magic: u32,
    #[serde(with = "hex_hash")]
    pub content_hash: [u8; 32],
    pub address_count: u64,
    pub appearance_count: u64,
    pub range: BlockRange,
}

mod hex_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(hash)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let mut out = [0u8; 32];
        hex::decode_to_slice(s.trim_start_matches("0x"), &mut out)
            .map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

impl ChunkHeader {
    /// Encode the on-disk part of the header (everything but the range).
    pub fn encode(&self) -> [u8; CHUNK_HEADER_WIDTH] {
        let mut out = [0u8; CHUNK_HEADER_WIDTH];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..36].copy_from_slice(&self.content_hash);
        out[36..44].copy_from_slice(&self.address_count.to_le_bytes());
        out[44..52].copy_from_slice(&self.appearance_count.to_le_bytes());
        out
    }

    /// Decode header bytes; the caller supplies the range and checks magic.
    pub fn decode(bytes: &[u8; CHUNK_HEADER_WIDTH], range: BlockRange) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let mut content_hash = [0u8; 32];
        content_hash.copy_from_slice(&bytes[4..36]);
        let mut address_count = [0u8; 8];
        address_count.copy_from_slice(&bytes[36..44]);
        let mut appearance_count = [0u8; 8];
        appearance_count.copy_from_slice(&bytes[44..52]);

        Self {
            magic: u32::from_le_bytes(magic),
            content_hash,
            address_count: u64::from_le_bytes(address_count),
            appearance_count: u64::from_le_bytes(appearance_count),
            range,
        }
    }

    /// Content hash as `0x`-prefixed hex.
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.content_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_field_offsets() {
        let header = ChunkHeader {
            magic: CHUNK_MAGIC,
            content_hash: [0x11; 32],
            address_count: 3,
            appearance_count: 0x0102,
            range: BlockRange::new(0, 0),
        };
        let bytes = header.encode();
        assert_eq!(&bytes[0..4], &[0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(bytes[36], 3);
        assert_eq!(&bytes[44..46], &[0x02, 0x01]);
        assert_eq!(ChunkHeader::decode(&bytes, header.range), header);
    }

    #[test]
    fn test_header_serializes_hash_as_hex() {
        let header = ChunkHeader {
            magic: CHUNK_MAGIC,
            content_hash: [0xab; 32],
            address_count: 1,
            appearance_count: 1,
            range: BlockRange::new(5, 9),
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["content_hash"], format!("0x{}", "ab".repeat(32)));
        assert_eq!(json["range"]["end"], 9);
    }
}

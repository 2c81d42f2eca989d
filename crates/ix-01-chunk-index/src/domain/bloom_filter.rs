//! Chunk bloom filter
//!
//! Every chunk carries one filter over the raw 20-byte addresses it holds.
//! A negative answer is authoritative; a positive one must be confirmed
//! against the chunk's address table.
//!
//! Serialized with bincode as `(hashes, inserted, bit_len, raw bytes)`.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::hash_functions::compute_hash_positions;
use super::parameters::{estimated_fpr, FilterSizing, MAX_HASHES};
use crate::error::ChunkError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    bits: BitVec<u8, Lsb0>,
    hashes: u32,
    inserted: u64,
}

#[derive(Serialize, Deserialize)]
struct WireFilter {
    hashes: u32,
    inserted: u64,
    bit_len: u64,
    raw: Vec<u8>,
}

impl BloomFilter {
    pub fn with_sizing(sizing: FilterSizing) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; sizing.bits.max(1)],
            hashes: sizing.hashes.max(1),
            inserted: 0,
        }
    }

    /// Filter sized for `addresses` entries at `target_fpr`.
    pub fn for_addresses(addresses: usize, target_fpr: f64) -> Self {
        Self::with_sizing(FilterSizing::for_addresses(addresses, target_fpr))
    }

    fn positions(&self, element: &[u8]) -> Vec<usize> {
        compute_hash_positions(element, self.hashes as usize, self.bits.len())
    }

    pub fn insert(&mut self, element: &[u8]) {
        for pos in self.positions(element) {
            self.bits.set(pos, true);
        }
        self.inserted += 1;
    }

    /// `false` means definitely absent.
    pub fn contains(&self, element: &[u8]) -> bool {
        self.positions(element)
            .into_iter()
            .all(|pos| self.bits.get(pos).is_some_and(|bit| *bit))
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn hashes(&self) -> u32 {
        self.hashes
    }

    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Estimated false positive rate at the current fill.
    pub fn estimated_fpr(&self) -> f64 {
        estimated_fpr(self.bits.len(), self.inserted, self.hashes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ChunkError> {
        let wire = WireFilter {
            hashes: self.hashes,
            inserted: self.inserted,
            bit_len: self.bits.len() as u64,
            raw: self.bits.as_raw_slice().to_vec(),
        };
        bincode::serialize(&wire).map_err(|e| ChunkError::Bloom(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChunkError> {
        let wire: WireFilter =
            bincode::deserialize(bytes).map_err(|e| ChunkError::Bloom(e.to_string()))?;
        let bit_len = usize::try_from(wire.bit_len)
            .map_err(|_| ChunkError::Bloom(format!("bit length {} too large", wire.bit_len)))?;
        if bit_len == 0 || wire.raw.len() * 8 < bit_len || !(1..=MAX_HASHES).contains(&wire.hashes) {
            return Err(ChunkError::Bloom(format!(
                "inconsistent filter: {} bytes for {} bits, {} hashes",
                wire.raw.len(),
                bit_len,
                wire.hashes
            )));
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(wire.raw);
        bits.truncate(bit_len);
        Ok(Self {
            bits,
            hashes: wire.hashes,
            inserted: wire.inserted,
        })
    }
}

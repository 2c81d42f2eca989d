//! Filter sizing for a chunk's address set
//!
//! For `n` addresses at a target false positive rate `p`:
//! `bits = ceil(-n ln p / ln²2)`, `hashes = round(bits / n · ln 2)`.

use std::f64::consts::LN_2;

/// Smallest filter ever written; keeps empty chunks decodable.
pub const MIN_FILTER_BITS: usize = 64;

/// Upper bound on hash functions per filter.
pub const MAX_HASHES: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSizing {
    pub bits: usize,
    pub hashes: u32,
}

impl FilterSizing {
    /// Sizing for `addresses` entries at `target_fpr`.
    pub fn for_addresses(addresses: usize, target_fpr: f64) -> Self {
        if addresses == 0 {
            return Self {
                bits: MIN_FILTER_BITS,
                hashes: 1,
            };
        }
        let n = addresses as f64;
        let bits = (-n * target_fpr.ln() / (LN_2 * LN_2)).ceil() as usize;
        let bits = bits.max(MIN_FILTER_BITS);
        let hashes = ((bits as f64 / n) * LN_2).round() as u32;
        Self {
            bits,
            hashes: hashes.clamp(1, MAX_HASHES),
        }
    }

    /// Expected false positive rate once `inserted` addresses are in.
    pub fn expected_fpr(&self, inserted: u64) -> f64 {
        estimated_fpr(self.bits, inserted, self.hashes)
    }
}

/// `(1 - e^(-k·n/m))^k`
pub fn estimated_fpr(bits: usize, inserted: u64, hashes: u32) -> f64 {
    if bits == 0 {
        return 1.0;
    }
    let fill = -(hashes as f64) * (inserted as f64) / (bits as f64);
    (1.0 - fill.exp()).powi(hashes as i32)
}

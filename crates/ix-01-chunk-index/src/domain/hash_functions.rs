//! Hash functions for the chunk bloom filter
//!
//! MurmurHash3 (x64, 128-bit) with double hashing: `h(i) = h1 + i * h2`.

use std::io::Cursor;

/// Hash an element with MurmurHash3 using a seed, keeping the low 64 bits.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Compute `k` bit positions in a filter of `m` bits.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);
    let m = m.max(1) as u64;

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_hash_deterministic() {
        let element = [0xABu8; 20];
        assert_eq!(murmur_hash(&element, 7), murmur_hash(&element, 7));
    }

    #[test]
    fn test_different_seeds_differ() {
        let element = [0x11u8; 20];
        assert_ne!(murmur_hash(&element, 0), murmur_hash(&element, 1));
    }

    #[test]
    fn test_positions_in_bounds() {
        let element = [0x42u8; 20];
        let positions = compute_hash_positions(&element, 7, 997);
        assert_eq!(positions.len(), 7);
        assert!(positions.iter().all(|p| *p < 997));
    }
}

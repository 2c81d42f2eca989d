//! Address → appearances map, the unit of data written into one chunk.

use std::collections::BTreeMap;

use shared_types::{Address, AppearanceRecord};

use crate::error::ChunkError;

/// Appearances grouped by address.
///
/// Keys are fixed-width addresses, so iteration order is the byte order the
/// chunk's address table is sorted by. Records per address are kept sorted
/// and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressAppearanceMap {
    entries: BTreeMap<Address, Vec<AppearanceRecord>>,
}

impl AddressAppearanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one appearance. Returns `false` if it was already present.
    pub fn insert(&mut self, address: Address, record: AppearanceRecord) -> bool {
        let records = self.entries.entry(address).or_default();
        match records.binary_search(&record) {
            Ok(_) => false,
            Err(pos) => {
                records.insert(pos, record);
                true
            }
        }
    }

    /// Like [`insert`](Self::insert) for an address in string form. Any
    /// casing is accepted; the key is stored normalized.
    pub fn insert_str(&mut self, address: &str, record: AppearanceRecord) -> Result<bool, ChunkError> {
        let address =
            Address::parse(address).map_err(|e| ChunkError::InvalidAddress(e.to_string()))?;
        Ok(self.insert(address, record))
    }

    pub fn get(&self, address: &Address) -> Option<&[AppearanceRecord]> {
        self.entries.get(address).map(Vec::as_slice)
    }

    /// Distinct addresses.
    pub fn address_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Total records across all addresses.
    pub fn appearance_count(&self) -> u64 {
        self.entries.values().map(|v| v.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &[AppearanceRecord])> {
        self.entries.iter().map(|(a, r)| (a, r.as_slice()))
    }
}

impl FromIterator<(Address, AppearanceRecord)> for AddressAppearanceMap {
    fn from_iter<I: IntoIterator<Item = (Address, AppearanceRecord)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (address, record) in iter {
            map.insert(address, record);
        }
        map
    }
}

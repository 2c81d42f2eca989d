//! Range Chunk Store
//!
//! Reads and writes the immutable, block-range-named chunk files under
//! `<index-root>/<chain>/finalized/`.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha3::{Digest, Keccak256};
use shared_types::{Address, AppearanceRecord, BlockRange, IndexPaths, ADDRESS_LEN, RECORD_WIDTH};
use tracing::{debug, info, warn};

use crate::domain::{
    AddressAppearanceMap, BloomFilter, ChunkConfig, ChunkHeader, ADDRESS_ENTRY_WIDTH,
    CHUNK_HEADER_WIDTH, CHUNK_MAGIC,
};
use crate::error::ChunkError;
use crate::ports::ChunkIndexApi;

/// Parse the `%09d-%09d` range out of a chunk file name.
pub fn range_from_filename(path: &Path) -> Result<BlockRange, ChunkError> {
    Ok(BlockRange::from_path(path)?)
}

fn decode_error(path: &Path, reason: impl Into<String>) -> ChunkError {
    ChunkError::Decode {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn keccak(bytes: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Summary of one finalized chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkInfo {
    pub path: PathBuf,
    pub range: BlockRange,
    pub magic: u32,
    pub hash: String,
    pub address_count: u64,
    pub appearance_count: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy)]
struct TableEntry {
    address: Address,
    offset: u32,
    count: u32,
}

/// A chunk loaded into memory for lookups.
#[derive(Debug)]
pub struct ChunkReader {
    header: ChunkHeader,
    bloom: BloomFilter,
    table: Vec<TableEntry>,
    records: Vec<AppearanceRecord>,
}

impl ChunkReader {
    /// Load and structurally validate the chunk at `path`.
    ///
    /// The content hash is not recomputed here; see
    /// [`RangeChunkStore::verify`].
    pub fn open(path: &Path) -> Result<Self, ChunkError> {
        let mut file = File::open(path)?;
        let (header, bloom) = read_prefix(path, &mut file)?;
        Self::load_tables(path, &mut file, header, bloom)
    }

    /// Records for `address` in the chunk at `path`.
    ///
    /// Only the header and bloom filter are read when the filter rules the
    /// address out; the tables are loaded on a hit.
    pub fn lookup(path: &Path, address: &Address) -> Result<Vec<AppearanceRecord>, ChunkError> {
        let mut file = File::open(path)?;
        let (header, bloom) = read_prefix(path, &mut file)?;
        if !bloom.contains(address.as_bytes()) {
            return Ok(Vec::new());
        }
        Ok(Self::load_tables(path, &mut file, header, bloom)?.appearances_for(address))
    }

    fn load_tables(
        path: &Path,
        file: &mut File,
        header: ChunkHeader,
        bloom: BloomFilter,
    ) -> Result<Self, ChunkError> {
        let mut rest = Vec::new();
        file.read_to_end(&mut rest)?;

        let table_len = (header.address_count as usize)
            .checked_mul(ADDRESS_ENTRY_WIDTH)
            .ok_or_else(|| decode_error(path, "address count overflows"))?;
        let table_bytes = rest
            .get(..table_len)
            .ok_or_else(|| decode_error(path, "address table truncated"))?;

        let records_len = (header.appearance_count as usize)
            .checked_mul(RECORD_WIDTH)
            .ok_or_else(|| decode_error(path, "appearance count overflows"))?;
        if rest.len() - table_len != records_len {
            return Err(decode_error(
                path,
                format!(
                    "appearance table is {} bytes, header implies {}",
                    rest.len() - table_len,
                    records_len
                ),
            ));
        }
        let records = AppearanceRecord::decode_all(&rest[table_len..])
            .map_err(|e| decode_error(path, e.to_string()))?;

        let mut table = Vec::with_capacity(header.address_count as usize);
        for entry in table_bytes.chunks_exact(ADDRESS_ENTRY_WIDTH) {
            let mut address = [0u8; ADDRESS_LEN];
            address.copy_from_slice(&entry[..ADDRESS_LEN]);
            let offset = le_u32(&entry[ADDRESS_LEN..]);
            let count = le_u32(&entry[ADDRESS_LEN + 4..]);
            if offset as usize + count as usize > records.len() {
                return Err(decode_error(
                    path,
                    format!("entry for 0x{} points past the appearance table", hex::encode(address)),
                ));
            }
            table.push(TableEntry {
                address: Address(address),
                offset,
                count,
            });
        }
        if table.windows(2).any(|w| w[0].address >= w[1].address) {
            return Err(decode_error(path, "address table is not sorted"));
        }

        Ok(Self {
            header,
            bloom,
            table,
            records,
        })
    }

    pub fn header(&self) -> &ChunkHeader {
        &self.header
    }

    pub fn range(&self) -> BlockRange {
        self.header.range
    }

    /// Bloom test. Never a false negative.
    pub fn might_contain(&self, address: &Address) -> bool {
        self.bloom.contains(address.as_bytes())
    }

    /// Records for `address`, confirmed against the address table.
    pub fn appearances_for(&self, address: &Address) -> Vec<AppearanceRecord> {
        if !self.might_contain(address) {
            return Vec::new();
        }
        match self.table.binary_search_by(|e| e.address.cmp(address)) {
            Ok(i) => {
                let entry = self.table[i];
                let start = entry.offset as usize;
                self.records[start..start + entry.count as usize].to_vec()
            }
            Err(_) => Vec::new(),
        }
    }

    /// Every address in the chunk, in table order.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.table.iter().map(|e| &e.address)
    }
}

fn decode_header(path: &Path, bytes: &[u8]) -> Result<ChunkHeader, ChunkError> {
    let range = range_from_filename(path)?;
    let raw: &[u8; CHUNK_HEADER_WIDTH] = bytes
        .get(..CHUNK_HEADER_WIDTH)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| decode_error(path, "file is shorter than the chunk header"))?;
    let header = ChunkHeader::decode(raw, range);
    if header.magic != CHUNK_MAGIC {
        return Err(ChunkError::BadMagic {
            path: path.to_path_buf(),
            found: header.magic,
        });
    }
    Ok(header)
}

fn read_exact_or_decode(
    path: &Path,
    file: &mut File,
    buf: &mut [u8],
    what: &str,
) -> Result<(), ChunkError> {
    file.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            decode_error(path, what)
        } else {
            ChunkError::Io(e)
        }
    })
}

fn read_header_from(path: &Path, file: &mut File) -> Result<ChunkHeader, ChunkError> {
    let mut raw = [0u8; CHUNK_HEADER_WIDTH];
    read_exact_or_decode(path, file, &mut raw, "file is shorter than the chunk header")?;
    decode_header(path, &raw)
}

/// Header and bloom filter, leaving `file` positioned at the address table.
fn read_prefix(path: &Path, file: &mut File) -> Result<(ChunkHeader, BloomFilter), ChunkError> {
    let header = read_header_from(path, file)?;
    let mut len = [0u8; 4];
    read_exact_or_decode(path, file, &mut len, "missing bloom length")?;
    let bloom_len = u32::from_le_bytes(len) as u64;

    let size = file.metadata()?.len();
    if (CHUNK_HEADER_WIDTH as u64 + 4).saturating_add(bloom_len) > size {
        return Err(decode_error(path, "bloom filter truncated"));
    }
    let mut bloom_bytes = vec![0u8; bloom_len as usize];
    read_exact_or_decode(path, file, &mut bloom_bytes, "bloom filter truncated")?;
    let bloom = BloomFilter::from_bytes(&bloom_bytes)?;
    Ok((header, bloom))
}

/// Read only the fixed header of a chunk file.
pub fn read_chunk_header(path: &Path) -> Result<ChunkHeader, ChunkError> {
    let mut file = File::open(path)?;
    read_header_from(path, &mut file)
}

/// Result of scanning the finalized folder.
#[derive(Debug, Default)]
pub struct ChunkListing {
    /// Readable chunks, sorted by range start.
    pub chunks: Vec<ChunkInfo>,
    /// Chunk-named files whose header could not be read.
    pub unreadable: Vec<(PathBuf, ChunkError)>,
}

/// Chunk store for one chain.
#[derive(Debug, Clone)]
pub struct RangeChunkStore {
    paths: IndexPaths,
    chain: String,
    config: ChunkConfig,
}

impl RangeChunkStore {
    pub fn new(paths: IndexPaths, chain: impl Into<String>, config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self {
            paths,
            chain: chain.into(),
            config,
        })
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn chunks_dir(&self) -> PathBuf {
        self.paths.chunks_dir(&self.chain)
    }

    pub fn chunk_path(&self, range: BlockRange) -> PathBuf {
        self.paths.chunk_path(&self.chain, range)
    }

    pub fn chunk_exists(&self, range: BlockRange) -> bool {
        self.chunk_path(range).is_file()
    }

    /// Read only the fixed header of a chunk file.
    pub fn read_chunk_header(&self, path: &Path) -> Result<ChunkHeader, ChunkError> {
        read_chunk_header(path)
    }

    /// Serialize `map` into a chunk at `path`, returning the bytes written.
    ///
    /// `address_count` is what the caller expects the map to hold; the
    /// header always records the real number of distinct addresses.
    /// `appearance_count_override`, when given, must agree with the map.
    pub fn write_chunk(
        &self,
        path: &Path,
        map: &AddressAppearanceMap,
        address_count: u64,
        appearance_count_override: Option<u64>,
    ) -> Result<u64, ChunkError> {
        let range = range_from_filename(path)?;
        let actual_addresses = map.address_count();
        let actual_appearances = map.appearance_count();

        if address_count != actual_addresses {
            warn!(
                chain = %self.chain,
                range = %range,
                expected = address_count,
                actual = actual_addresses,
                "Address count differs from map; writing the map's count"
            );
        }
        if let Some(expected) = appearance_count_override {
            if expected != actual_appearances {
                return Err(ChunkError::CountMismatch {
                    expected,
                    actual: actual_appearances,
                });
            }
        }
        if actual_appearances > u32::MAX as u64 {
            return Err(ChunkError::TooLarge {
                count: actual_appearances,
            });
        }

        let expected_elements = (actual_addresses as usize).max(self.config.min_filter_elements);
        let mut bloom = BloomFilter::for_addresses(expected_elements, self.config.target_fpr);
        for (address, _) in map.iter() {
            bloom.insert(address.as_bytes());
        }
        debug!(
            range = %range,
            bits = bloom.bit_len(),
            hashes = bloom.hashes(),
            fpr = bloom.estimated_fpr(),
            "Sized chunk bloom filter"
        );
        let bloom_bytes = bloom.to_bytes()?;

        let mut body = Vec::with_capacity(
            4 + bloom_bytes.len()
                + actual_addresses as usize * ADDRESS_ENTRY_WIDTH
                + actual_appearances as usize * RECORD_WIDTH,
        );
        body.extend_from_slice(&(bloom_bytes.len() as u32).to_le_bytes());
        body.extend_from_slice(&bloom_bytes);

        let mut offset: u32 = 0;
        for (address, records) in map.iter() {
            body.extend_from_slice(address.as_bytes());
            body.extend_from_slice(&offset.to_le_bytes());
            body.extend_from_slice(&(records.len() as u32).to_le_bytes());
            offset += records.len() as u32;
        }
        for (_, records) in map.iter() {
            for record in records {
                body.extend_from_slice(&record.to_bytes());
            }
        }

        let header = ChunkHeader {
            magic: CHUNK_MAGIC,
            content_hash: keccak(&body),
            address_count: actual_addresses,
            appearance_count: actual_appearances,
            range,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("bin.tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&header.encode())?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, path)?;

        let written = (CHUNK_HEADER_WIDTH + body.len()) as u64;
        info!(
            chain = %self.chain,
            range = %range,
            addresses = actual_addresses,
            appearances = actual_appearances,
            bytes = written,
            "Wrote chunk"
        );
        Ok(written)
    }

    /// Load a chunk for lookups.
    pub fn open_chunk(&self, path: &Path) -> Result<ChunkReader, ChunkError> {
        ChunkReader::open(path)
    }

    /// Recompute the content hash and compare it with the header.
    pub fn verify(&self, path: &Path) -> Result<ChunkHeader, ChunkError> {
        let bytes = fs::read(path)?;
        let header = decode_header(path, &bytes)?;
        if keccak(&bytes[CHUNK_HEADER_WIDTH..]) != header.content_hash {
            return Err(ChunkError::HashMismatch {
                path: path.to_path_buf(),
            });
        }
        Ok(header)
    }

    /// Scan the finalized folder. Files whose names are not block ranges
    /// are skipped; chunks with an unreadable header are reported in
    /// [`ChunkListing::unreadable`] instead of failing the scan.
    pub fn scan_chunks(&self) -> Result<ChunkListing, ChunkError> {
        let dir = self.chunks_dir();
        let mut listing = ChunkListing::default();
        if !dir.is_dir() {
            return Ok(listing);
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(shared_types::paths::CHUNK_EXT) {
                continue;
            }
            if let Err(e) = range_from_filename(&path) {
                debug!(path = %path.display(), error = %e, "Skipping non-chunk file");
                continue;
            }
            match chunk_info(&path) {
                Ok(info) => listing.chunks.push(info),
                Err(e) => {
                    warn!(chain = %self.chain, chunk = %path.display(), error = %e, "Unreadable chunk header");
                    listing.unreadable.push((path, e));
                }
            }
        }
        listing.chunks.sort_by_key(|c| c.range);
        listing.unreadable.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listing)
    }

    /// Readable finalized chunks, sorted by range start.
    pub fn list_chunks(&self) -> Result<Vec<ChunkInfo>, ChunkError> {
        Ok(self.scan_chunks()?.chunks)
    }
}

fn chunk_info(path: &Path) -> Result<ChunkInfo, ChunkError> {
    let header = read_chunk_header(path)?;
    let size = fs::metadata(path)?.len();
    Ok(ChunkInfo {
        hash: header.hash_hex(),
        path: path.to_path_buf(),
        range: header.range,
        magic: header.magic,
        address_count: header.address_count,
        appearance_count: header.appearance_count,
        size,
    })
}

impl ChunkIndexApi for RangeChunkStore {
    fn list_chunks(&self) -> Result<Vec<ChunkInfo>, ChunkError> {
        RangeChunkStore::list_chunks(self)
    }

    fn appearances_for(
        &self,
        chunk: &Path,
        address: &Address,
    ) -> Result<Vec<AppearanceRecord>, ChunkError> {
        ChunkReader::lookup(chunk, address)
    }
}

//! # Path Layout
//!
//! Where every file of the index lives, relative to three roots:
//!
//! ```text
//! <cache-root>/<chain>/monitors/0x….mon.bin           production monitors
//! <cache-root>/<chain>/monitors/staging/0x….mon.bin   staged monitors
//! <config-root>/<chain>/mocked/monitors/…             test-mode monitors
//! <config-root>/<chain>/allocs.csv                    genesis allocations
//! <index-root>/<chain>/finalized/000000000-000000000.bin
//! <index-root>/<chain>/{ripe,unripe,maps,staging}/    scraper scratch folders
//! <index-root>/<chain>/ts.bin                         timestamps
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::{Address, BlockNumber};
use crate::errors::RangeParseError;

/// File extension of monitor files.
pub const MONITOR_EXT: &str = ".mon.bin";

/// File extension of chunk files.
pub const CHUNK_EXT: &str = "bin";

/// Scratch folders wiped when the scraper starts.
pub const TEMP_FOLDERS: [&str; 3] = ["ripe", "unripe", "maps"];

/// Folder holding chunks that are being assembled; kept across restarts.
pub const STAGING_FOLDER: &str = "staging";

/// Roots of the on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPaths {
    pub cache_root: PathBuf,
    pub index_root: PathBuf,
    pub config_root: PathBuf,
}

impl IndexPaths {
    pub fn new(
        cache_root: impl Into<PathBuf>,
        index_root: impl Into<PathBuf>,
        config_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache_root: cache_root.into(),
            index_root: index_root.into(),
            config_root: config_root.into(),
        }
    }

    /// All three roots under one directory (`cache/`, `index/`, `config/`).
    pub fn under(base: &Path) -> Self {
        Self::new(base.join("cache"), base.join("index"), base.join("config"))
    }

    /// Per-chain cache folder. Test mode redirects to the chain's `mocked/`
    /// config folder.
    pub fn chain_cache(&self, chain: &str, test_mode: bool) -> PathBuf {
        if test_mode {
            self.config_root.join(chain).join("mocked")
        } else {
            self.cache_root.join(chain)
        }
    }

    /// Folder holding monitor files.
    pub fn monitors_dir(&self, chain: &str, staged: bool, test_mode: bool) -> PathBuf {
        let dir = self.chain_cache(chain, test_mode).join("monitors");
        if staged {
            dir.join(STAGING_FOLDER)
        } else {
            dir
        }
    }

    /// Full path of one monitor file.
    pub fn monitor_path(&self, chain: &str, address: &Address, staged: bool, test_mode: bool) -> PathBuf {
        self.monitors_dir(chain, staged, test_mode)
            .join(format!("{}{}", address.to_hex(), MONITOR_EXT))
    }

    /// Per-chain index folder.
    pub fn chain_index(&self, chain: &str) -> PathBuf {
        self.index_root.join(chain)
    }

    /// Folder holding finalized chunks.
    pub fn chunks_dir(&self, chain: &str) -> PathBuf {
        self.chain_index(chain).join("finalized")
    }

    /// Full path of the chunk covering `range`.
    pub fn chunk_path(&self, chain: &str, range: BlockRange) -> PathBuf {
        self.chunks_dir(chain)
            .join(format!("{}.{}", range.file_stem(), CHUNK_EXT))
    }

    /// Timestamp database.
    pub fn timestamps_path(&self, chain: &str) -> PathBuf {
        self.chain_index(chain).join("ts.bin")
    }

    /// Genesis allocation list.
    pub fn allocs_path(&self, chain: &str) -> PathBuf {
        self.config_root.join(chain).join("allocs.csv")
    }
}

/// Inclusive block range covered by a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: BlockNumber,
    pub end: BlockNumber,
}

impl BlockRange {
    pub const fn new(start: BlockNumber, end: BlockNumber) -> Self {
        Self { start, end }
    }

    /// `%09d-%09d`.
    pub fn file_stem(&self) -> String {
        format!("{:09}-{:09}", self.start, self.end)
    }

    /// Inverse of [`BlockRange::file_stem`], applied to the file name of
    /// `path` (directory and extension are ignored).
    pub fn from_path(path: &Path) -> Result<Self, RangeParseError> {
        let input = path.display().to_string();
        let err = |reason| RangeParseError {
            input: input.clone(),
            reason,
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| err("no file name"))?;
        let stem = name.split('.').next().unwrap_or(name);
        let (first, last) = stem.split_once('-').ok_or_else(|| err("missing '-'"))?;

        if first.len() != 9 || last.len() != 9 {
            return Err(err("bounds must be nine digits"));
        }
        let start = first.parse().map_err(|_| err("start is not a number"))?;
        let end = last.parse().map_err(|_| err("end is not a number"))?;
        if end < start {
            return Err(err("end precedes start"));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

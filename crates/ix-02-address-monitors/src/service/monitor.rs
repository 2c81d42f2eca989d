//! Monitor file operations
//!
//! A [`Monitor`] is a handle on one address's log. It owns a lazily opened
//! read handle that is reused across header and record reads; writes open
//! their own handles so a reader never observes a half-written header slot.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use shared_types::{Address, AppearanceRecord, IndexPaths, RECORD_WIDTH};
use tracing::{debug, info};

use crate::domain::{MagicCheck, MonitorCleanReport, MonitorHeader, MonitorSummary, MONITOR_MAGIC};
use crate::error::MonitorError;

const SLOT: u64 = RECORD_WIDTH as u64;

/// Handle on one address's monitor file.
#[derive(Debug)]
pub struct Monitor {
    address: Address,
    chain: String,
    staged: bool,
    test_mode: bool,
    paths: IndexPaths,
    magic_check: MagicCheck,
    header: MonitorHeader,
    reader: Option<File>,
}

impl Monitor {
    /// Open the production monitor for `address`.
    ///
    /// With `create`, a missing file is initialized with a header-only
    /// (8-byte) file. Without it, a missing file reads as empty.
    pub fn open(
        paths: &IndexPaths,
        chain: &str,
        address: Address,
        create: bool,
        test_mode: bool,
    ) -> Result<Self, MonitorError> {
        let monitor = Self::handle(paths, chain, address, false, test_mode);
        if create && !monitor.path().exists() {
            monitor.write_fresh_file()?;
        }
        Ok(monitor)
    }

    /// Open the staged monitor for `address`, the only copy the scraper
    /// writes to.
    ///
    /// A missing staged file is seeded from the production file when one
    /// exists, otherwise initialized header-only.
    pub fn open_staged(
        paths: &IndexPaths,
        chain: &str,
        address: Address,
        test_mode: bool,
    ) -> Result<Self, MonitorError> {
        let monitor = Self::handle(paths, chain, address, true, test_mode);
        let staged_path = monitor.path();
        if !staged_path.exists() {
            let production = monitor.production_path();
            if production.is_file() {
                if let Some(parent) = staged_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&production, &staged_path)?;
                debug!(address = %address, "Seeded staged monitor from production");
            } else {
                monitor.write_fresh_file()?;
            }
        }
        Ok(monitor)
    }

    fn handle(paths: &IndexPaths, chain: &str, address: Address, staged: bool, test_mode: bool) -> Self {
        Self {
            address,
            chain: chain.to_string(),
            staged,
            test_mode,
            paths: paths.clone(),
            magic_check: MagicCheck::default(),
            header: MonitorHeader::default(),
            reader: None,
        }
    }

    pub fn with_magic_check(mut self, magic_check: MagicCheck) -> Self {
        self.magic_check = magic_check;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn is_staged(&self) -> bool {
        self.staged
    }

    /// Header as of the last read or write through this handle.
    pub fn cached_header(&self) -> MonitorHeader {
        self.header
    }

    /// Current path, staged or production depending on the handle's state.
    pub fn path(&self) -> PathBuf {
        self.paths
            .monitor_path(&self.chain, &self.address, self.staged, self.test_mode)
    }

    fn production_path(&self) -> PathBuf {
        self.paths
            .monitor_path(&self.chain, &self.address, false, self.test_mode)
    }

    fn write_fresh_file(&self) -> Result<(), MonitorError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, MonitorHeader::default().to_bytes())?;
        debug!(address = %self.address, staged = self.staged, "Created monitor");
        Ok(())
    }

    /// Size of the file in bytes; 0 when it does not exist.
    pub fn file_size(&self) -> Result<u64, MonitorError> {
        match fs::metadata(self.path()) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(MonitorError::Io(e)),
        }
    }

    /// Number of appearance records.
    pub fn count(&self) -> Result<u32, MonitorError> {
        let slots = self.file_size()? / SLOT;
        Ok(slots.saturating_sub(1).min(u32::MAX as u64) as u32)
    }

    fn reader(&mut self) -> Result<&mut File, MonitorError> {
        if self.reader.is_none() {
            self.reader = Some(File::open(self.path())?);
        }
        match self.reader.as_mut() {
            Some(file) => Ok(file),
            None => Err(MonitorError::Io(ErrorKind::NotFound.into())),
        }
    }

    fn read_slot(&mut self, slot: u64) -> Result<[u8; RECORD_WIDTH], MonitorError> {
        let path = self.path();
        let file = self.reader()?;
        file.seek(SeekFrom::Start(slot * SLOT))?;
        let mut buf = [0u8; RECORD_WIDTH];
        file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                MonitorError::Decode {
                    path,
                    reason: format!("slot {} is truncated", slot),
                }
            } else {
                MonitorError::Io(e)
            }
        })?;
        Ok(buf)
    }

    /// Decode slot 0.
    pub fn read_header(&mut self) -> Result<MonitorHeader, MonitorError> {
        let header = MonitorHeader::from_bytes(self.read_slot(0)?);
        if self.magic_check == MagicCheck::Strict && header.magic != MONITOR_MAGIC {
            return Err(MonitorError::BadMagic {
                path: self.path(),
                found: header.magic,
            });
        }
        self.header = header;
        Ok(header)
    }

    /// The on-disk header, or the default one when the file holds none yet.
    fn current_header(&mut self) -> Result<MonitorHeader, MonitorError> {
        if self.file_size()? >= SLOT {
            self.read_header()
        } else {
            Ok(MonitorHeader::default())
        }
    }

    /// Record `idx`, 1-based.
    pub fn read_appearance_at(&mut self, idx: u32) -> Result<AppearanceRecord, MonitorError> {
        let count = self.count()?;
        if idx == 0 || idx > count {
            return Err(MonitorError::IndexOutOfRange { index: idx, count });
        }
        Ok(AppearanceRecord::from_bytes(self.read_slot(idx as u64)?))
    }

    /// Every record, in file order.
    pub fn read_all(&mut self) -> Result<Vec<AppearanceRecord>, MonitorError> {
        if self.file_size()? <= SLOT {
            return Ok(Vec::new());
        }
        let path = self.path();
        let file = self.reader()?;
        file.seek(SeekFrom::Start(SLOT))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        AppearanceRecord::decode_all(&bytes).map_err(|e| MonitorError::Decode {
            path,
            reason: e.to_string(),
        })
    }

    /// Rewrite slot 0 in place. `last_scanned` is only ever raised.
    pub fn write_header(&mut self, deleted: bool, last_scanned: u32) -> Result<(), MonitorError> {
        let current = self.current_header()?;
        let header = MonitorHeader {
            deleted,
            last_scanned: current.last_scanned.max(last_scanned),
            ..current
        };

        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header.to_bytes())?;
        file.flush()?;

        self.header = header;
        Ok(())
    }

    /// Append `records`, raising `last_scanned` first. Staged handles only.
    pub fn append_records(
        &mut self,
        last_scanned: u32,
        records: &[AppearanceRecord],
    ) -> Result<u32, MonitorError> {
        if !self.staged {
            return Err(MonitorError::NotStaged {
                address: self.address,
            });
        }
        let deleted = self.current_header()?.deleted;
        self.write_header(deleted, last_scanned)?;
        self.write_appearances(records)
    }

    /// Append `records` at the end of the file, returning the new count.
    ///
    /// A missing or empty file gets the cached header in slot 0 first.
    pub fn write_appearances(&mut self, records: &[AppearanceRecord]) -> Result<u32, MonitorError> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let size = self.file_size()?;
        if size % SLOT != 0 {
            return Err(MonitorError::Decode {
                path,
                reason: format!("file size {} is not a multiple of {}", size, SLOT),
            });
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if size == 0 {
            file.write_all(&self.header.to_bytes())?;
        }

        let mut writer = BufWriter::new(file);
        for record in records {
            record.write_to(&mut writer)?;
        }
        writer.flush()?;
        Ok(self.count()?)
    }

    /// Set the tombstone, returning its previous value.
    pub fn delete(&mut self) -> Result<bool, MonitorError> {
        self.set_deleted(true)
    }

    /// Clear the tombstone, returning its previous value.
    pub fn undelete(&mut self) -> Result<bool, MonitorError> {
        self.set_deleted(false)
    }

    fn set_deleted(&mut self, deleted: bool) -> Result<bool, MonitorError> {
        let current = self.current_header()?;
        self.write_header(deleted, current.last_scanned)?;
        Ok(current.deleted)
    }

    /// Remove the file. Requires the tombstone to be set first.
    pub fn remove(&mut self) -> Result<bool, MonitorError> {
        if !self.current_header()?.deleted {
            return Err(MonitorError::NotDeleted {
                address: self.address,
            });
        }
        self.reader = None;
        let path = self.path();
        fs::remove_file(&path)?;
        info!(address = %self.address, "Removed monitor");
        Ok(!path.exists())
    }

    /// Publish the staged file with a single rename.
    pub fn move_to_production(&mut self) -> Result<(), MonitorError> {
        if !self.staged {
            return Err(MonitorError::NotStaged {
                address: self.address,
            });
        }
        let from = self.path();
        let to = self.production_path();
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&from, &to)?;
        self.staged = false;
        self.reader = None;
        info!(address = %self.address, chain = %self.chain, "Promoted monitor to production");
        Ok(())
    }

    pub fn summary(&mut self) -> Result<MonitorSummary, MonitorError> {
        let header = self.current_header()?;
        Ok(MonitorSummary {
            address: self.address,
            n_records: self.count()?,
            file_size: self.file_size()?,
            last_scanned: header.last_scanned,
            deleted: header.deleted,
        })
    }

    /// Sort and de-duplicate a staged monitor, rewriting it wholesale.
    pub fn clean(&mut self) -> Result<MonitorCleanReport, MonitorError> {
        if !self.staged {
            return Err(MonitorError::NotStaged {
                address: self.address,
            });
        }
        let size_then = self.file_size()?;
        let header = self.current_header()?;
        let mut records = self.read_all()?;
        let before = records.len();
        let ordered = records.windows(2).all(|w| w[0] < w[1]);
        records.sort_unstable();
        records.dedup();
        let dups = (before - records.len()) as u32;

        if !ordered || dups > 0 {
            self.rewrite(&header, &records)?;
        }

        let report = MonitorCleanReport {
            address: self.address,
            dups,
            size_then,
            size_now: self.file_size()?,
        };
        debug!(address = %self.address, dups, "Cleaned monitor");
        Ok(report)
    }

    fn rewrite(&mut self, header: &MonitorHeader, records: &[AppearanceRecord]) -> Result<(), MonitorError> {
        let path = self.path();
        let temp_path = path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(&header.to_bytes())?;
            for record in records {
                record.write_to(&mut writer)?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &path)?;
        self.reader = None;
        Ok(())
    }
}

/// The address of a file named `0x<40 lowercase hex>.mon.bin`.
pub(crate) fn monitor_address_from_path(path: &Path) -> Option<Address> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(shared_types::paths::MONITOR_EXT)?;
    let address = Address::parse(stem).ok()?;
    (address.to_hex() == stem).then_some(address)
}

//! Monitor enumeration
//!
//! Monitors come from one of two places:
//!
//! 1. the override list (`./addresses.csv` unless configured otherwise), one
//!    address per line, trailing comma-separated fields ignored, `#` lines
//!    skipped. Invalid and zero addresses are skipped with a debug log.
//! 2. otherwise, every `0x<40 hex>.mon.bin` file directly inside
//!    `<cache>/<chain>/<folder>`, in directory order.
//!
//! Production runs on a blocking task feeding a bounded channel. The stream
//! ends when the channel closes; every queued monitor is still delivered.

use std::fs;
use std::path::{Path, PathBuf};

use shared_types::{paths::STAGING_FOLDER, Address, IndexPaths};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::MagicCheck;
use crate::error::MonitorError;
use crate::service::monitor::{monitor_address_from_path, Monitor};

/// Override list consulted before the monitor folder.
pub const DEFAULT_OVERRIDE_FILE: &str = "addresses.csv";

const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Enumerates the monitors of one chain.
#[derive(Debug, Clone)]
pub struct MonitorDirectory {
    paths: IndexPaths,
    chain: String,
    test_mode: bool,
    override_file: PathBuf,
    magic_check: MagicCheck,
    queue_capacity: usize,
}

impl MonitorDirectory {
    pub fn new(paths: IndexPaths, chain: impl Into<String>) -> Self {
        Self {
            paths,
            chain: chain.into(),
            test_mode: false,
            override_file: PathBuf::from(DEFAULT_OVERRIDE_FILE),
            magic_check: MagicCheck::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_override_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_file = path.into();
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_magic_check(mut self, magic_check: MagicCheck) -> Self {
        self.magic_check = magic_check;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Stream the monitors of `folder` (relative to the chain's cache folder,
    /// e.g. `monitors` or `monitors/staging`).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn list_monitors(&self, folder: &str) -> mpsc::Receiver<Result<Monitor, MonitorError>> {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let this = self.clone();
        let folder = folder.to_string();
        tokio::task::spawn_blocking(move || {
            this.produce(&folder, |item| tx.blocking_send(item).is_ok());
        });
        rx
    }

    /// Synchronous variant of [`list_monitors`](Self::list_monitors). Stops
    /// at the first error.
    pub fn collect(&self, folder: &str) -> Result<Vec<Monitor>, MonitorError> {
        let mut monitors = Vec::new();
        let mut failure = None;
        self.produce(folder, |item| match item {
            Ok(monitor) => {
                monitors.push(monitor);
                true
            }
            Err(e) => {
                failure = Some(e);
                false
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(monitors),
        }
    }

    /// Feed monitors to `emit` until exhausted or `emit` returns `false`.
    fn produce<F>(&self, folder: &str, mut emit: F)
    where
        F: FnMut(Result<Monitor, MonitorError>) -> bool,
    {
        if self.override_file.is_file() {
            let addresses = match read_override_file(&self.override_file) {
                Ok(addresses) => addresses,
                Err(e) => {
                    emit(Err(e));
                    return;
                }
            };
            info!(
                file = %self.override_file.display(),
                count = addresses.len(),
                "Using override address list"
            );
            for address in addresses {
                let monitor = Monitor::open(&self.paths, &self.chain, address, true, self.test_mode)
                    .map(|m| m.with_magic_check(self.magic_check));
                if !emit(monitor) {
                    return;
                }
            }
            return;
        }

        let dir = self.paths.chain_cache(&self.chain, self.test_mode).join(folder);
        let staged = Path::new(folder).ends_with(STAGING_FOLDER);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Monitor folder does not exist");
                return;
            }
            Err(e) => {
                emit(Err(e.into()));
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    if !emit(Err(e.into())) {
                        return;
                    }
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Some(address) = monitor_address_from_path(&path) else {
                continue;
            };
            let monitor = if staged {
                Monitor::open_staged(&self.paths, &self.chain, address, self.test_mode)
            } else {
                Monitor::open(&self.paths, &self.chain, address, true, self.test_mode)
            };
            if !emit(monitor.map(|m| m.with_magic_check(self.magic_check))) {
                return;
            }
        }
    }
}

/// Parse the override list, keeping valid non-zero addresses in file order.
fn read_override_file(path: &Path) -> Result<Vec<Address>, MonitorError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(std::io::Error::from)?;

    let mut addresses = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable override line");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match parse_override_entry(line, record.get(0).unwrap_or("")) {
            Ok(address) => addresses.push(address),
            Err(e) => debug!(error = %e, "Skipping override entry"),
        }
    }
    Ok(addresses)
}

fn parse_override_entry(line: u64, field: &str) -> Result<Address, MonitorError> {
    let invalid = || MonitorError::InvalidOverrideEntry {
        line,
        entry: field.to_string(),
    };
    let address = Address::parse(field).map_err(|_| invalid())?;
    if address.is_zero() {
        return Err(invalid());
    }
    Ok(address)
}

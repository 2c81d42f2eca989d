//! # Bootstrap Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). One lock file per chain index folder keeps two scrapers on the
//! same chain from interleaving bootstrap steps.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::error::BootstrapError;

/// Exclusive lock on a chain's index folder, released on drop.
#[derive(Debug)]
pub struct BootstrapLock {
    file: File,
    path: PathBuf,
}

impl BootstrapLock {
    /// Lock file name
    const LOCK_FILE: &'static str = "bootstrap.lock";

    /// Try to take the lock without waiting.
    pub fn acquire(chain_index: &Path) -> Result<Self, BootstrapError> {
        std::fs::create_dir_all(chain_index)?;
        let path = chain_index.join(Self::LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(BootstrapError::Locked { path });
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        debug!(lock = %path.display(), "Acquired bootstrap lock");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BootstrapLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!(lock = %self.path.display(), error = %e, "Failed to release bootstrap lock");
        }
    }
}

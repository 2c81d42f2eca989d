//! Scratch folder cleanup
//!
//! The scraper leaves partial work in `ripe/`, `unripe/` and `maps/` when it
//! is interrupted. Those folders are emptied on startup; `staging/` is only
//! emptied on request because it may hold a chunk in progress.

use std::fs;
use std::path::{Path, PathBuf};

use shared_types::paths::{STAGING_FOLDER, TEMP_FOLDERS};
use tracing::{debug, warn};

/// Outcome of a cleanup pass. Failures are collected, never fatal.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl CleanReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Empty the scratch folders under `chain_index`.
pub fn clean_temporary_folders(chain_index: &Path, include_staging: bool) -> CleanReport {
    let mut report = CleanReport::default();
    let staging = include_staging.then_some(STAGING_FOLDER);

    for folder in TEMP_FOLDERS.iter().copied().chain(staging) {
        let dir = chain_index.join(folder);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(folder = %dir.display(), error = %e, "Cannot read scratch folder");
                report.failures.push((dir, e.to_string()));
                continue;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    report.failures.push((dir.clone(), e.to_string()));
                    continue;
                }
            };
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot remove scratch file");
                    report.failures.push((path, e.to_string()));
                }
            }
        }
    }

    debug!(
        root = %chain_index.display(),
        removed = report.removed,
        failures = report.failures.len(),
        "Cleaned scratch folders"
    );
    report
}

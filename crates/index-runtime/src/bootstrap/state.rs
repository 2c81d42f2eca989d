//! Persisted bootstrap state

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BootstrapError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapState {
    #[default]
    NotStarted,
    ChunkWritten,
    TimestampWritten,
    Pinned,
}

impl BootstrapState {
    /// Reconcile the persisted state with what is on disk.
    ///
    /// A missing chunk always means starting over. A chunk without a
    /// persisted state was written by an earlier run that never recorded
    /// one, so only the later steps are redone.
    pub fn reconcile(self, chunk_exists: bool) -> Self {
        match (chunk_exists, self) {
            (false, _) => BootstrapState::NotStarted,
            (true, BootstrapState::NotStarted) => BootstrapState::ChunkWritten,
            (true, state) => state,
        }
    }
}

/// `bootstrap.json` in the chain's index folder.
#[derive(Debug, Clone)]
pub struct BootstrapStateFile {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct Persisted {
    state: BootstrapState,
}

impl BootstrapStateFile {
    pub fn new(chain_index: &Path) -> Self {
        Self {
            path: chain_index.join("bootstrap.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored state, `NotStarted` when the file is absent.
    pub fn load(&self) -> Result<BootstrapState, BootstrapError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BootstrapState::NotStarted)
            }
            Err(e) => return Err(e.into()),
        };
        let persisted: Persisted =
            serde_json::from_slice(&bytes).map_err(|e| BootstrapError::State {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(persisted.state)
    }

    /// Write atomically via temp file.
    pub fn store(&self, state: BootstrapState) -> Result<(), BootstrapError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&Persisted { state }).map_err(|e| {
            BootstrapError::State {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

//! Chunk writing configuration

use serde::{Deserialize, Serialize};

use crate::error::ChunkError;

/// Configuration for chunk writing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target false positive rate of each chunk's bloom filter
    pub target_fpr: f64,
    /// Lower bound on the number of elements the filter is sized for, so
    /// tiny chunks do not get degenerate filters
    pub min_filter_elements: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            target_fpr: 0.001,
            min_filter_elements: 64,
        }
    }
}

impl ChunkConfig {
    pub fn with_target_fpr(mut self, target_fpr: f64) -> Self {
        self.target_fpr = target_fpr;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ChunkError> {
        if !(self.target_fpr > 0.0 && self.target_fpr < 1.0) {
            return Err(ChunkError::InvalidConfig(format!(
                "target_fpr must be in (0, 1), got {}",
                self.target_fpr
            )));
        }
        if self.min_filter_elements == 0 {
            return Err(ChunkError::InvalidConfig(
                "min_filter_elements must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

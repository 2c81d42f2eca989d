//! # Index Configuration
//!
//! Runtime parameters with sane defaults, overridable from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `IX_CHAIN` | `mainnet` |
//! | `IX_CACHE_ROOT` | `./data/cache` |
//! | `IX_INDEX_ROOT` | `./data/index` |
//! | `IX_CONFIG_ROOT` | `./data/config` |
//! | `IX_ADDRESSES_FILE` | `./addresses.csv` |
//! | `IX_TEST_MODE` | `false` |
//! | `IX_STRICT_MAGIC` | `false` |
//! | `IX_QUEUE_CAPACITY` | `64` |

use std::env;
use std::path::PathBuf;

use ix_01_chunk_index::ChunkConfig;
use ix_02_address_monitors::{MagicCheck, DEFAULT_OVERRIDE_FILE};
use shared_types::IndexPaths;
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Chain name must not be empty")]
    EmptyChain,

    #[error("Chain name '{0}' must not contain path separators")]
    InvalidChain(String),

    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("Invalid chunk configuration: {0}")]
    Chunk(String),
}

/// Complete index configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Chain name; one folder per chain under each root.
    pub chain: String,
    /// Root of monitor files and cached chain data.
    pub cache_root: PathBuf,
    /// Root of chunks, timestamps and bootstrap state.
    pub index_root: PathBuf,
    /// Root of per-chain configuration (allocations, test-mode monitors).
    pub config_root: PathBuf,
    /// Override address list.
    pub override_file: PathBuf,
    /// Redirect monitors to the chain's `mocked/` config folder.
    pub test_mode: bool,
    /// Monitor header magic validation.
    pub magic_check: MagicCheck,
    /// Capacity of the monitor enumeration queue.
    pub queue_capacity: usize,
    /// Chunk writing parameters.
    pub chunk: ChunkConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chain: "mainnet".to_string(),
            cache_root: PathBuf::from("./data/cache"),
            index_root: PathBuf::from("./data/index"),
            config_root: PathBuf::from("./data/config"),
            override_file: PathBuf::from(DEFAULT_OVERRIDE_FILE),
            test_mode: false,
            magic_check: MagicCheck::Permissive,
            queue_capacity: 64,
            chunk: ChunkConfig::default(),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

impl IndexConfig {
    /// Defaults overridden by `IX_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(chain) = env::var("IX_CHAIN") {
            config.chain = chain;
        }
        if let Ok(root) = env::var("IX_CACHE_ROOT") {
            config.cache_root = PathBuf::from(root);
        }
        if let Ok(root) = env::var("IX_INDEX_ROOT") {
            config.index_root = PathBuf::from(root);
        }
        if let Ok(root) = env::var("IX_CONFIG_ROOT") {
            config.config_root = PathBuf::from(root);
        }
        if let Ok(file) = env::var("IX_ADDRESSES_FILE") {
            config.override_file = PathBuf::from(file);
        }
        if let Some(test_mode) = env_flag("IX_TEST_MODE") {
            config.test_mode = test_mode;
        }
        if let Some(true) = env_flag("IX_STRICT_MAGIC") {
            config.magic_check = MagicCheck::Strict;
        }
        if let Ok(capacity) = env::var("IX_QUEUE_CAPACITY") {
            match capacity.parse() {
                Ok(c) => config.queue_capacity = c,
                Err(_) => warn!(value = %capacity, "IX_QUEUE_CAPACITY is not a number, ignoring"),
            }
        }

        config
    }

    /// All roots under `base` (`cache/`, `index/`, `config/`).
    pub fn under(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            cache_root: base.join("cache"),
            index_root: base.join("index"),
            config_root: base.join("config"),
            ..Self::default()
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
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

    pub fn paths(&self) -> IndexPaths {
        IndexPaths::new(&self.cache_root, &self.index_root, &self.config_root)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.trim().is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        if self.chain.contains(['/', '\\']) || self.chain == ".." {
            return Err(ConfigError::InvalidChain(self.chain.clone()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        self.chunk
            .validate()
            .map_err(|e| ConfigError::Chunk(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_chain() {
        assert!(matches!(
            IndexConfig::default().with_chain("  ").validate(),
            Err(ConfigError::EmptyChain)
        ));
        assert!(matches!(
            IndexConfig::default().with_chain("a/b").validate(),
            Err(ConfigError::InvalidChain(_))
        ));
    }

    #[test]
    fn test_under_sets_all_roots() {
        let config = IndexConfig::under("/tmp/ix");
        let paths = config.paths();
        assert_eq!(paths.cache_root, PathBuf::from("/tmp/ix/cache"));
        assert_eq!(paths.index_root, PathBuf::from("/tmp/ix/index"));
        assert_eq!(paths.config_root, PathBuf::from("/tmp/ix/config"));
    }
}

//! Timestamp database at `<index-root>/<chain>/ts.bin`
//!
//! Record `n` sits at byte `n * 8`: `[block u32][timestamp u32]`,
//! little-endian. Writing past the end leaves zero-filled holes, which read
//! back as absent.

use std::io::SeekFrom;

use async_trait::async_trait;
use shared_types::{IndexPaths, RECORD_WIDTH};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::BootstrapError;
use crate::ports::{TimestampRecord, TimestampStore};

#[derive(Debug, Clone)]
pub struct FileTimestampStore {
    paths: IndexPaths,
}

impl FileTimestampStore {
    pub fn new(paths: IndexPaths) -> Self {
        Self { paths }
    }
}

fn ts_err(e: std::io::Error) -> BootstrapError {
    BootstrapError::Timestamp(e.to_string())
}

#[async_trait]
impl TimestampStore for FileTimestampStore {
    async fn put(&self, chain: &str, record: TimestampRecord) -> Result<(), BootstrapError> {
        let path = self.paths.timestamps_path(chain);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(ts_err)?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .await
            .map_err(ts_err)?;

        let mut bytes = [0u8; RECORD_WIDTH];
        bytes[..4].copy_from_slice(&record.block_number.to_le_bytes());
        bytes[4..].copy_from_slice(&record.timestamp.to_le_bytes());

        file.seek(SeekFrom::Start(record.block_number as u64 * RECORD_WIDTH as u64))
            .await
            .map_err(ts_err)?;
        file.write_all(&bytes).await.map_err(ts_err)?;
        file.sync_all().await.map_err(ts_err)?;
        Ok(())
    }

    async fn get(
        &self,
        chain: &str,
        block_number: u32,
    ) -> Result<Option<TimestampRecord>, BootstrapError> {
        let path = self.paths.timestamps_path(chain);
        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ts_err(e)),
        };
        let offset = block_number as u64 * RECORD_WIDTH as u64;
        let len = file.metadata().await.map_err(ts_err)?.len();
        if len < offset + RECORD_WIDTH as u64 {
            return Ok(None);
        }

        let mut bytes = [0u8; RECORD_WIDTH];
        file.seek(SeekFrom::Start(offset)).await.map_err(ts_err)?;
        file.read_exact(&mut bytes).await.map_err(ts_err)?;
        let record = TimestampRecord {
            block_number: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            timestamp: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        };
        if record.block_number != block_number || record.timestamp == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }
}

//! Pin hook that only logs
//!
//! Pinning chunks to a content network is outside this workspace; this
//! adapter records that a pin was requested.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::error::BootstrapError;
use crate::ports::PinHook;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPinHook;

impl LoggingPinHook {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PinHook for LoggingPinHook {
    async fn chunk_written(&self, chain: &str, chunk: &Path) -> Result<(), BootstrapError> {
        info!(chain, chunk = %chunk.display(), "Pin requested for new chunk");
        Ok(())
    }
}

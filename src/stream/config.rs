//! Stream chunk configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlimError};

/// Default chunk size for stream bridges (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Configuration shared by [`StreamChunkReader`](super::StreamChunkReader)
/// and [`StreamChunkWriter`](super::StreamChunkWriter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Size of the in-memory chunk, and the largest span either side hands out
    pub chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StreamConfig {
    /// Set the chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(SlimError::invalid_parameter(
                "chunk_size",
                "cannot be zero",
            ));
        }

        Ok(())
    }
}

/// Builder pattern for stream configuration
#[derive(Debug, Default)]
pub struct StreamConfigBuilder {
    config: StreamConfig,
}

impl StreamConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StreamConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

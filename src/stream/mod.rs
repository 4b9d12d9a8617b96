//! Stream chunk bridges
//!
//! Blocking readers and writers that move data between a `std::io` stream
//! and one pooled in-memory chunk, so callers can work on contiguous spans
//! without a read or write call per value.

pub mod chunk_reader;
pub mod chunk_writer;
pub mod config;

// Re-export main types
pub use chunk_reader::StreamChunkReader;
pub use chunk_writer::StreamChunkWriter;
pub use config::{StreamConfig, StreamConfigBuilder, DEFAULT_CHUNK_SIZE};

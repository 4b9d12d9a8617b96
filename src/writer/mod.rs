//! Growable writer
//!
//! [`BufferWriter`] appends into a caller slice and transparently moves to
//! pooled memory when it runs out of room. Byte writers additionally get
//! endian-aware helpers.

pub mod buffer_writer;
pub mod byte_ext;

// Re-export main types
pub use buffer_writer::{BufferWriter, FALLBACK_GROWTH, MAX_CAPACITY};

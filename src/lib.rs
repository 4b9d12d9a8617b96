//! # Slimbuf - Pooled Buffers and Binary Codecs
//!
//! Slimbuf is a low-allocation buffer toolkit: arrays are rented from
//! size-class pools, written through growable writers, encoded with
//! explicit endianness, and streamed in fixed-size chunks.
//!
//! ## Features
//!
//! - **Array pools**: Power-of-two buckets with a process-wide pool per type
//! - **Ownership wrappers**: Leased memory with a logical length and idempotent disposal
//! - **Growable writer**: Starts on caller memory, moves to pooled memory when full
//! - **Binary codec**: Little/big endian values, UTF-8/UTF-16 text, raw strings
//! - **Stream bridges**: Chunked reading and writing over `std::io` streams
//! - **Ring buffers**: Fixed capacity, overwrite-oldest, two-slice views
//! - **Region buffer**: Many independently growable regions in one byte buffer
//! - **Pooled collections**: List, insertion-ordered set and array builder on rented arrays
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │        ByteReader / ByteWriter (codec)          │
//! ├────────────────────────┬────────────────────────┤
//! │  Stream chunk bridges  │  RegionByteBuffer      │
//! ├────────────────────────┴────────────────────────┤
//! │  BufferWriter          │  Rings / PooledList    │
//! ├─────────────────────────────────────────────────┤
//! │  MemoryOwner / SpanOwner                        │
//! ├─────────────────────────────────────────────────┤
//! │  ArrayPool (size-class buckets)                 │
//! └─────────────────────────────────────────────────┘
//! ```

// Core modules
pub mod error;
pub mod owner;
pub mod pool;
pub mod writer;

// Encoding and I/O
pub mod codec;
pub mod stream;

// Containers
pub mod collections;
pub mod region;
pub mod ring;

// Main API re-exports
pub use codec::{ByteReader, ByteWriter, RawUtf16, TextEncoding, Unmanaged};
pub use collections::{ArrayBuilder, PackedBools, PooledList, PooledSet};
pub use error::{Result, SlimError};
pub use owner::{MemoryOwner, SpanOwner};
pub use pool::{ArrayPool, Lease, PoolConfig, PoolConfigBuilder, PoolStats, Poolable};
pub use region::{RegionByteBuffer, RegionHeader, RegionId};
pub use ring::{CircularBuffer, CircularBufferSlim, TwoSpan, TwoSpanMut};
pub use stream::{StreamChunkReader, StreamChunkWriter, StreamConfig, StreamConfigBuilder};
pub use writer::BufferWriter;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

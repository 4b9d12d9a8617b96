//! Region-partitioned byte buffer
//!
//! One contiguous, pool-backed byte buffer split into numbered regions.
//! Each region can be appended to independently; its bytes are always
//! stored contiguously so they can be read back as a single slice.

pub mod buffer;
pub mod headers;

// Re-export main types
pub use buffer::{RegionByteBuffer, DEFAULT_REGION_CAPACITY};
pub use headers::{RegionHeader, RegionId, EMPTY_HANDLE, HANDLE_SIZE, HEADER_SIZE};

//! Pooled-array allocator
//!
//! Arrays are leased from power-of-two size-class buckets and handed back
//! when the [`Lease`] is dropped. Every element type gets one process-wide
//! pool through [`ArrayPool::shared`], and callers can build private pools
//! with their own [`PoolConfig`].

pub mod array_pool;
pub mod config;
pub mod shared;
pub mod stats;

// Re-export main types
pub use array_pool::{ArrayPool, Lease, Poolable, MIN_ARRAY_LENGTH};
pub use config::{PoolConfig, PoolConfigBuilder};
pub use stats::{AtomicPoolStats, PoolStats};

//! Size-class array pool and the lease it hands out

use std::{fmt, mem, sync::Arc};

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;

use super::{
    config::PoolConfig,
    stats::{AtomicPoolStats, PoolStats},
};

/// Smallest array length handed out by a bucket
pub const MIN_ARRAY_LENGTH: usize = 16;

/// Element types that can live in a pooled array
///
/// Fresh arrays are filled with `T::default()`, and pools are shared across
/// threads, hence the bounds.
pub trait Poolable: Default + Send + 'static {}

impl<T: Default + Send + 'static> Poolable for T {}

/// A pool lending arrays of at least a requested length
///
/// Arrays are grouped in power-of-two size classes from
/// [`MIN_ARRAY_LENGTH`] up to [`PoolConfig::max_array_length`]. Larger
/// requests are allocated exactly and dropped when their lease ends.
/// Renting and returning are safe from any number of threads.
pub struct ArrayPool<T> {
    /// Configuration
    config: PoolConfig,
    /// Idle arrays, one bucket per size class
    buckets: Box<[Mutex<Vec<Box<[T]>>>]>,
    /// Statistics
    stats: AtomicPoolStats,
}

impl<T: Poolable> ArrayPool<T> {
    /// Create a private pool with the given configuration
    pub fn new(config: PoolConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub(crate) fn from_valid_config(config: PoolConfig) -> Arc<Self> {
        let buckets = (0..config.bucket_count())
            .map(|_| Mutex::new(Vec::new()))
            .collect();

        Arc::new(Self {
            config,
            buckets,
            stats: AtomicPoolStats::new(),
        })
    }

    /// Rent an array holding at least `min_size` elements
    ///
    /// The lease goes back to this pool when it is dropped.
    pub fn rent(self: &Arc<Self>, min_size: usize) -> Lease<T> {
        if min_size == 0 {
            return Lease {
                array: Box::default(),
                bucket: None,
                pool: Arc::clone(self),
            };
        }

        let Some(index) = self.bucket_index(min_size) else {
            trace!(min_size, "renting unpooled oversize array");
            self.stats.record_rent(false);
            return Lease {
                array: allocate(min_size),
                bucket: None,
                pool: Arc::clone(self),
            };
        };

        let idle = self.buckets[index].lock().pop();
        let reused = idle.is_some();
        let array = idle.unwrap_or_else(|| {
            let length = bucket_length(index);
            trace!(min_size, length, "array pool miss");
            allocate(length)
        });
        self.stats.record_rent(reused);

        Lease {
            array,
            bucket: Some(index),
            pool: Arc::clone(self),
        }
    }

    fn give_back(&self, mut array: Box<[T]>, bucket: Option<usize>) {
        let Some(index) = bucket else {
            self.stats.record_return(false);
            return;
        };

        if self.config.clear_on_return || mem::needs_drop::<T>() {
            array.iter_mut().for_each(|slot| *slot = T::default());
        }

        let retained = {
            let mut idle = self.buckets[index].lock();
            if idle.len() < self.config.max_arrays_per_bucket {
                idle.push(array);
                true
            } else {
                false
            }
        };
        self.stats.record_return(retained);
    }

    fn bucket_index(&self, min_size: usize) -> Option<usize> {
        if min_size > self.config.max_array_length {
            return None;
        }

        let length = min_size.max(MIN_ARRAY_LENGTH).next_power_of_two();
        Some((length.trailing_zeros() - MIN_ARRAY_LENGTH.trailing_zeros()) as usize)
    }

    /// Get pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get current statistics
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Number of idle arrays across all buckets
    pub fn idle_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.lock().len()).sum()
    }

    /// Drop every idle array, returning how many were released
    pub fn trim(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| {
                let mut idle = bucket.lock();
                let count = idle.len();
                idle.clear();
                count
            })
            .sum()
    }
}

impl<T> fmt::Debug for ArrayPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPool")
            .field("element", &std::any::type_name::<T>())
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

fn bucket_length(index: usize) -> usize {
    MIN_ARRAY_LENGTH << index
}

fn allocate<T: Default>(length: usize) -> Box<[T]> {
    std::iter::repeat_with(T::default).take(length).collect()
}

/// An array rented from an [`ArrayPool`]
///
/// The lease owns its array exclusively and returns it to the pool exactly
/// once, when dropped.
pub struct Lease<T: Poolable> {
    array: Box<[T]>,
    bucket: Option<usize>,
    pool: Arc<ArrayPool<T>>,
}

impl<T: Poolable> Lease<T> {
    /// Physical length of the rented array (at least the requested size)
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Whether the array goes back into a bucket on return
    pub fn is_pooled(&self) -> bool {
        self.bucket.is_some()
    }

    /// The whole rented array
    pub fn as_slice(&self) -> &[T] {
        &self.array
    }

    /// The whole rented array, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.array
    }

    /// The pool this lease returns to
    pub fn pool(&self) -> &Arc<ArrayPool<T>> {
        &self.pool
    }
}

impl<T: Poolable> Drop for Lease<T> {
    fn drop(&mut self) {
        if self.array.is_empty() && self.bucket.is_none() {
            return;
        }

        let array = mem::take(&mut self.array);
        self.pool.give_back(array, self.bucket);
    }
}

impl<T: Poolable> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("capacity", &self.array.len())
            .field("bucket", &self.bucket)
            .finish()
    }
}

//! Pool-backed memory with a logical length

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use crate::pool::{ArrayPool, Lease, Poolable};

/// Owns a lease from an [`ArrayPool`] and exposes its first `len` elements
///
/// The logical length can move freely up to the lease's physical capacity
/// with [`try_resize`](Self::try_resize); growing beyond it requires a new
/// owner. Disposal returns the lease and is idempotent; dropping the owner
/// disposes it.
pub struct MemoryOwner<T: Poolable> {
    /// Rented array, `None` once disposed
    lease: Option<Lease<T>>,
    /// Logical length (<= lease capacity)
    length: usize,
}

impl<T: Poolable> MemoryOwner<T> {
    /// Rent at least `min_size` elements from the shared pool
    ///
    /// The first `min_size` elements are reset to `T::default()`.
    pub fn new(min_size: usize) -> Self {
        Self::rent_from(&ArrayPool::shared(), min_size, true)
    }

    /// Rent at least `min_size` elements without clearing previous contents
    pub fn uncleared(min_size: usize) -> Self {
        Self::rent_from(&ArrayPool::shared(), min_size, false)
    }

    /// Rent from a specific pool
    pub fn rent_from(pool: &Arc<ArrayPool<T>>, min_size: usize, clear: bool) -> Self {
        let mut lease = pool.rent(min_size);
        if clear {
            lease.as_mut_slice()[..min_size]
                .iter_mut()
                .for_each(|slot| *slot = T::default());
        }

        Self {
            lease: Some(lease),
            length: min_size,
        }
    }

    /// Physical capacity of the lease (0 after disposal)
    pub fn capacity(&self) -> usize {
        self.lease.as_ref().map_or(0, Lease::capacity)
    }

    /// Logical length
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if the logical length is zero
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if the lease has been returned
    pub fn is_disposed(&self) -> bool {
        self.lease.is_none()
    }

    /// Elements `[0, len)`
    pub fn as_slice(&self) -> &[T] {
        match &self.lease {
            Some(lease) => &lease.as_slice()[..self.length],
            None => &[],
        }
    }

    /// Elements `[0, len)`, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.lease {
            Some(lease) => &mut lease.as_mut_slice()[..self.length],
            None => &mut [],
        }
    }

    /// Change the logical length without touching the data
    ///
    /// Fails (returns `false`) when `new_length` exceeds the capacity; no
    /// reallocation ever happens here.
    pub fn try_resize(&mut self, new_length: usize) -> bool {
        if new_length > self.capacity() {
            return false;
        }

        self.length = new_length;
        true
    }

    /// Return the lease to its pool
    ///
    /// Safe to call any number of times.
    pub fn dispose(&mut self) {
        self.lease = None;
        self.length = 0;
    }
}

impl<T: Poolable> Deref for MemoryOwner<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Poolable> DerefMut for MemoryOwner<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Poolable> AsRef<[T]> for MemoryOwner<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Poolable> AsMut<[T]> for MemoryOwner<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Poolable> fmt::Debug for MemoryOwner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryOwner")
            .field("length", &self.length)
            .field("capacity", &self.capacity())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolConfig;

    #[test]
    fn test_rent_sets_length_and_capacity() {
        let owner = MemoryOwner::<u8>::new(10);
        assert_eq!(owner.len(), 10);
        assert!(owner.capacity() >= 10);
        assert_eq!(owner.as_slice().len(), 10);
    }

    #[test]
    fn test_new_clears_dirty_array() {
        let pool: Arc<ArrayPool<u8>> = ArrayPool::new(PoolConfig::default()).unwrap();
        {
            let mut dirty = MemoryOwner::rent_from(&pool, 100, false);
            dirty.fill(0xFF);
        }

        let owner = MemoryOwner::rent_from(&pool, 100, true);
        assert!(owner.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_uncleared_keeps_previous_contents() {
        let pool: Arc<ArrayPool<u8>> = ArrayPool::new(PoolConfig::default()).unwrap();
        {
            let mut dirty = MemoryOwner::rent_from(&pool, 50, false);
            dirty.fill(0xAA);
        }

        let owner = MemoryOwner::rent_from(&pool, 50, false);
        assert!(owner.iter().any(|&b| b == 0xAA));
    }

    #[test]
    fn test_try_resize_within_capacity() {
        let mut owner = MemoryOwner::<u8>::new(100);
        assert!(owner.try_resize(50));
        assert_eq!(owner.len(), 50);
    }

    #[test]
    fn test_try_resize_beyond_capacity_fails() {
        let mut owner = MemoryOwner::<u8>::new(10);
        let capacity = owner.capacity();

        assert!(!owner.try_resize(capacity + 1));
        assert_eq!(owner.len(), 10);
    }

    #[test]
    fn test_slice_reflects_current_length() {
        let mut owner = MemoryOwner::<u8>::new(10);
        owner.fill(1);
        owner.try_resize(5);

        assert_eq!(owner.as_slice(), &[1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_double_dispose_is_silent() {
        let pool: Arc<ArrayPool<u8>> = ArrayPool::new(PoolConfig::default()).unwrap();
        let mut owner = MemoryOwner::rent_from(&pool, 10, true);

        owner.dispose();
        owner.dispose();
        drop(owner);

        assert!(pool.stats().returned == 1);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_disposed_owner_is_empty() {
        let mut owner = MemoryOwner::<u32>::new(8);
        owner.dispose();

        assert!(owner.is_disposed());
        assert!(owner.is_empty());
        assert_eq!(owner.capacity(), 0);
        assert!(!owner.try_resize(1));
        assert!(owner.as_mut_slice().is_empty());
    }
}

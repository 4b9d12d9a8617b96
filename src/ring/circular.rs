//! Pool-backed fixed-capacity ring buffer

use std::{
    fmt,
    ops::{Index, IndexMut},
    sync::Arc,
};

use crate::{
    error::{Result, SlimError},
    owner::MemoryOwner,
    pool::{ArrayPool, Poolable},
};

use super::{
    cursor::RingCursor,
    two_span::{Iter, TwoSpan, TwoSpanMut},
};

/// A fixed-capacity ring that overwrites its oldest element when full
///
/// Storage is rented from a pool and returned when the buffer is dropped or
/// [`dispose`](Self::dispose)d.
pub struct CircularBuffer<T: Poolable> {
    storage: MemoryOwner<T>,
    cursor: RingCursor,
}

impl<T: Poolable> CircularBuffer<T> {
    /// Create a ring of `capacity` elements backed by the shared pool
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_pool(&ArrayPool::shared(), capacity)
    }

    /// Create a ring backed by `pool`
    pub fn with_pool(pool: &Arc<ArrayPool<T>>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SlimError::invalid_parameter(
                "capacity",
                "ring capacity must be greater than 0",
            ));
        }

        Ok(Self {
            storage: MemoryOwner::rent_from(pool, capacity, true),
            cursor: RingCursor::new(capacity),
        })
    }

    /// Get ring capacity
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Number of elements held
    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    /// Check if the ring holds no elements
    pub fn is_empty(&self) -> bool {
        self.cursor.len() == 0
    }

    /// Check if the next add overwrites the oldest element
    pub fn is_full(&self) -> bool {
        self.cursor.is_full()
    }

    /// Append `item`, overwriting the oldest element when full
    pub fn add(&mut self, item: T) {
        let slot = self.cursor.push();
        self.storage[slot] = item;
    }

    /// Element at logical `index` (0 is the oldest)
    pub fn get(&self, index: usize) -> Option<&T> {
        self.cursor.physical(index).map(|slot| &self.storage[slot])
    }

    /// Mutable element at logical `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.cursor.physical(index) {
            Some(slot) => Some(&mut self.storage[slot]),
            None => None,
        }
    }

    /// Reset every slot and forget all elements
    pub fn clear(&mut self) {
        self.storage
            .iter_mut()
            .for_each(|slot| *slot = T::default());
        self.cursor.reset();
    }

    /// The physical storage, in slot order
    pub fn buffer(&self) -> &[T] {
        &self.storage
    }

    /// Contents in logical order as one or two slices
    pub fn written_two_span(&self) -> TwoSpan<'_, T> {
        self.cursor.two_span(self.storage.as_slice())
    }

    /// Contents in logical order as one or two mutable slices
    pub fn written_two_span_mut(&mut self) -> TwoSpanMut<'_, T> {
        self.cursor.two_span_mut(self.storage.as_mut_slice())
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        self.written_two_span().iter()
    }

    /// Return the storage to its pool
    pub fn dispose(self) {}
}

impl<T: Poolable> Index<usize> for CircularBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {} out of range for ring of length {}", index, self.len()),
        }
    }
}

impl<T: Poolable> IndexMut<usize> for CircularBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {} out of range for ring of length {}", index, len),
        }
    }
}

impl<'a, T: Poolable> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Poolable> Extend<T> for CircularBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Poolable + fmt::Debug> fmt::Debug for CircularBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

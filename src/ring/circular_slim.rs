//! Ring buffer over caller-owned memory

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::error::{Result, SlimError};

use super::{
    cursor::RingCursor,
    two_span::{Iter, TwoSpan, TwoSpanMut},
};

/// Same ring semantics as [`CircularBuffer`](super::CircularBuffer), over a
/// borrowed slice
///
/// The capacity is the slice length. Nothing is rented, so there is nothing
/// to dispose.
pub struct CircularBufferSlim<'a, T> {
    storage: &'a mut [T],
    cursor: RingCursor,
}

impl<'a, T> CircularBufferSlim<'a, T> {
    /// Use `storage` as the ring; its current contents are ignored
    pub fn new(storage: &'a mut [T]) -> Result<Self> {
        if storage.is_empty() {
            return Err(SlimError::invalid_parameter(
                "storage",
                "ring capacity must be greater than 0",
            ));
        }

        let cursor = RingCursor::new(storage.len());
        Ok(Self { storage, cursor })
    }

    /// Get ring capacity (the slice length)
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
    pub fn clear(&mut self)
    where
        T: Default,
    {
        self.storage
            .iter_mut()
            .for_each(|slot| *slot = T::default());
        self.cursor.reset();
    }

    /// The borrowed storage, in slot order
    pub fn buffer(&self) -> &[T] {
        &*self.storage
    }

    /// Contents in logical order as one or two slices
    pub fn written_two_span(&self) -> TwoSpan<'_, T> {
        self.cursor.two_span(&*self.storage)
    }

    /// Contents in logical order as one or two mutable slices
    pub fn written_two_span_mut(&mut self) -> TwoSpanMut<'_, T> {
        self.cursor.two_span_mut(&mut *self.storage)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        self.written_two_span().iter()
    }
}

impl<T> Index<usize> for CircularBufferSlim<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {} out of range for ring of length {}", index, self.len()),
        }
    }
}

impl<T> IndexMut<usize> for CircularBufferSlim<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {} out of range for ring of length {}", index, len),
        }
    }
}

impl<'s, T> IntoIterator for &'s CircularBufferSlim<'_, T> {
    type Item = &'s T;
    type IntoIter = Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for CircularBufferSlim<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularBufferSlim<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

//! Growable list on pooled memory

use std::{
    fmt,
    ops::{Index, IndexMut},
    slice,
    sync::Arc,
};

use tracing::trace;

use crate::{
    owner::MemoryOwner,
    pool::{ArrayPool, Poolable},
};

/// A `Vec`-like list whose storage is rented from an [`ArrayPool`]
///
/// Growth first widens the current lease in place when its physical
/// capacity allows; otherwise a larger array is rented, the live elements
/// are cloned over and the old lease goes back to the pool.
pub struct PooledList<T: Poolable + Clone> {
    owner: MemoryOwner<T>,
    pool: Arc<ArrayPool<T>>,
    len: usize,
}

impl<T: Poolable + Clone> PooledList<T> {
    /// Create a list with room for `initial_capacity` elements
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_pool(ArrayPool::shared(), initial_capacity)
    }

    /// Create a list that rents from `pool`
    pub fn with_pool(pool: Arc<ArrayPool<T>>, initial_capacity: usize) -> Self {
        Self {
            owner: MemoryOwner::rent_from(&pool, initial_capacity, true),
            pool,
            len: 0,
        }
    }

    /// Create a list holding a copy of `values`
    pub fn from_slice(values: &[T]) -> Self {
        let mut list = Self::new(values.len());
        list.add_range(values);
        list
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements that fit before the next growth
    pub fn capacity(&self) -> usize {
        self.owner.len()
    }

    /// Append one element, doubling the storage when full
    pub fn add(&mut self, item: T) {
        if self.len == self.capacity() {
            self.ensure_size(self.capacity().max(1).saturating_mul(2));
        }

        self.owner.as_mut_slice()[self.len] = item;
        self.len += 1;
    }

    /// Append a copy of `items`
    pub fn add_range(&mut self, items: &[T]) {
        if items.is_empty() {
            return;
        }

        let end = self.len + items.len();
        self.ensure_size(end);
        self.owner.as_mut_slice()[self.len..end].clone_from_slice(items);
        self.len = end;
    }

    /// Get the element at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Get the element at `index`, mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Position of the first element equal to `item`
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|candidate| candidate == item)
    }

    /// Check if an equal element is present
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(item)
    }

    /// Make room for at least `capacity` elements; never shrinks
    pub fn reserve(&mut self, capacity: usize) {
        self.ensure_size(capacity);
    }

    /// Move the elements to an array sized to the current length
    pub fn trim(&mut self) {
        if self.len >= self.capacity() {
            return;
        }
        self.relocate(self.len);
    }

    /// The live elements
    pub fn as_slice(&self) -> &[T] {
        &self.owner.as_slice()[..self.len]
    }

    /// The live elements, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.owner.as_mut_slice()[..len]
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably in insertion order
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Remove every element but keep the storage
    pub fn clear(&mut self) {
        self.as_mut_slice()
            .iter_mut()
            .for_each(|slot| *slot = T::default());
        self.len = 0;
    }

    /// Return the storage to the pool and empty the list
    ///
    /// The list stays usable; the next add rents again.
    pub fn dispose(&mut self) {
        self.owner.dispose();
        self.len = 0;
    }

    fn ensure_size(&mut self, size: usize) {
        if size <= self.capacity() || self.owner.try_resize(size) {
            return;
        }
        self.relocate(size);
    }

    fn relocate(&mut self, size: usize) {
        trace!(from = self.capacity(), to = size, len = self.len, "pooled list relocated");

        let mut next = MemoryOwner::rent_from(&self.pool, size, true);
        next.as_mut_slice()[..self.len].clone_from_slice(self.as_slice());
        // Dropping the previous owner hands its lease back
        self.owner = next;
    }
}

impl<T: Poolable + Clone> Default for PooledList<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Poolable + Clone> Index<usize> for PooledList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Poolable + Clone> IndexMut<usize> for PooledList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T: Poolable + Clone> IntoIterator for &'a PooledList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Poolable + Clone> Extend<T> for PooledList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Poolable + Clone> FromIterator<T> for PooledList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut list = Self::new(iter.size_hint().0);
        list.extend(iter);
        list
    }
}

impl<T: Poolable + Clone + fmt::Debug> fmt::Debug for PooledList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

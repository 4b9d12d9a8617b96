//! Insertion-ordered set on a pooled list

use std::{fmt, ops::Index, slice, sync::Arc};

use crate::pool::{ArrayPool, Poolable};

use super::pooled_list::PooledList;

/// A small set that keeps elements in insertion order
///
/// Membership is a linear scan over the backing [`PooledList`], which
/// suits the short lists this is meant for. Needs only `PartialEq`.
pub struct PooledSet<T: Poolable + Clone + PartialEq> {
    list: PooledList<T>,
}

impl<T: Poolable + Clone + PartialEq> PooledSet<T> {
    /// Create a set with room for `initial_capacity` elements
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            list: PooledList::new(initial_capacity),
        }
    }

    /// Create a set that rents from `pool`
    pub fn with_pool(pool: Arc<ArrayPool<T>>, initial_capacity: usize) -> Self {
        Self {
            list: PooledList::with_pool(pool, initial_capacity),
        }
    }

    /// Create a set from `values`, skipping duplicates
    pub fn from_slice(values: &[T]) -> Self {
        let mut set = Self::new(values.len());
        set.add_range(values);
        set
    }

    /// Number of distinct elements
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the set holds no elements
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Insert `item` unless an equal element is present
    ///
    /// Returns whether the item was inserted.
    pub fn add(&mut self, item: T) -> bool {
        if self.list.contains(&item) {
            return false;
        }

        self.list.add(item);
        true
    }

    /// Insert every element of `items`, returning how many were new
    pub fn add_range(&mut self, items: &[T]) -> usize {
        items
            .iter()
            .filter(|item| self.add((*item).clone()))
            .count()
    }

    /// Check if an equal element is present
    pub fn contains(&self, item: &T) -> bool {
        self.list.contains(item)
    }

    /// Check if any element of the set appears in `other`
    pub fn contains_any(&self, other: &[T]) -> bool {
        self.iter().any(|item| other.contains(item))
    }

    /// Get the element at insertion position `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get(index)
    }

    /// Elements in insertion order
    pub fn as_slice(&self) -> &[T] {
        self.list.as_slice()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.list.iter()
    }

    /// Remove every element but keep the storage
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Return the storage to the pool and empty the set
    pub fn dispose(&mut self) {
        self.list.dispose();
    }
}

impl<T: Poolable + Clone + PartialEq> Default for PooledSet<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Poolable + Clone + PartialEq> Index<usize> for PooledSet<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.list[index]
    }
}

impl<'a, T: Poolable + Clone + PartialEq> IntoIterator for &'a PooledSet<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Poolable + Clone + PartialEq> Extend<T> for PooledSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Poolable + Clone + PartialEq> FromIterator<T> for PooledSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Poolable + Clone + PartialEq + fmt::Debug> fmt::Debug for PooledSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

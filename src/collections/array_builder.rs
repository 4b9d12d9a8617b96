//! Append-only builder on pooled arrays

use std::{fmt, sync::Arc};

use tracing::trace;

use crate::{
    error::{Result, SlimError},
    pool::{ArrayPool, Lease, Poolable},
};

/// Smallest array rented on first growth unless configured otherwise
pub const DEFAULT_MIN_CAPACITY: usize = 16;

/// Collects elements into a pooled array that doubles when full
///
/// Nothing is rented until the first element arrives. Each growth rents an
/// array at least twice the current capacity (never below the minimum),
/// clones the written elements over and returns the old array.
pub struct ArrayBuilder<T: Poolable + Clone> {
    /// `None` until the first growth and after `dispose`
    buffer: Option<Lease<T>>,
    pool: Arc<ArrayPool<T>>,
    min_capacity: usize,
    len: usize,
}

impl<T: Poolable + Clone> ArrayBuilder<T> {
    /// Create an empty builder on the shared pool
    pub fn new() -> Self {
        Self::with_min_capacity(DEFAULT_MIN_CAPACITY)
    }

    /// Create an empty builder whose first rent is at least `min_capacity`
    pub fn with_min_capacity(min_capacity: usize) -> Self {
        Self::with_pool(ArrayPool::shared(), min_capacity)
    }

    /// Create an empty builder that rents from `pool`
    pub fn with_pool(pool: Arc<ArrayPool<T>>, min_capacity: usize) -> Self {
        Self {
            buffer: None,
            pool,
            min_capacity: min_capacity.max(1),
            len: 0,
        }
    }

    /// Number of written elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical length of the current array (0 before the first add)
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, Lease::capacity)
    }

    /// Append one element
    pub fn add(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow(self.capacity().saturating_mul(2));
        }

        let index = self.len;
        self.slots()[index] = item;
        self.len += 1;
    }

    /// Append a run of elements
    pub fn add_span(&mut self, items: &[T]) {
        if items.is_empty() {
            return;
        }

        let required = self.len.saturating_add(items.len());
        if required > self.capacity() {
            let mut capacity = self.capacity().saturating_mul(2).max(self.min_capacity);
            while capacity < required {
                capacity = capacity.saturating_mul(2);
            }
            self.grow(capacity);
        }

        let start = self.len;
        self.slots()[start..required].clone_from_slice(items);
        self.len = required;
    }

    /// Overwrite a written element
    pub fn set(&mut self, index: usize, item: T) -> Result<()> {
        if index >= self.len {
            return Err(SlimError::out_of_range("index", index, self.len));
        }

        self.slots()[index] = item;
        Ok(())
    }

    /// The written elements
    pub fn written(&self) -> &[T] {
        match &self.buffer {
            Some(lease) => &lease.as_slice()[..self.len],
            None => &[],
        }
    }

    /// The written elements, mutably
    pub fn written_mut(&mut self) -> &mut [T] {
        let len = self.len;
        match &mut self.buffer {
            Some(lease) => &mut lease.as_mut_slice()[..len],
            None => Default::default(),
        }
    }

    /// Copy the written elements into a `Vec`
    pub fn to_vec(&self) -> Vec<T> {
        self.written().to_vec()
    }

    /// Return the array to the pool and start over empty
    ///
    /// Safe to call repeatedly; the builder stays usable.
    pub fn dispose(&mut self) {
        self.buffer = None;
        self.len = 0;
    }

    fn grow(&mut self, requested: usize) {
        let capacity = requested.max(self.min_capacity);
        trace!(from = self.capacity(), to = capacity, len = self.len, "array builder grown");

        let mut next = self.pool.rent(capacity);
        next.as_mut_slice()[..self.len].clone_from_slice(self.written());
        // The replaced lease goes back to the pool on drop
        self.buffer = Some(next);
    }

    fn slots(&mut self) -> &mut [T] {
        match &mut self.buffer {
            Some(lease) => lease.as_mut_slice(),
            None => Default::default(),
        }
    }
}

impl<T: Poolable + Clone> Default for ArrayBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable + Clone> Extend<T> for ArrayBuilder<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Poolable + Clone + fmt::Debug> fmt::Debug for ArrayBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayBuilder")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("written", &self.written())
            .finish()
    }
}

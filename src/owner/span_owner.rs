//! Scoped view over either borrowed or leased memory

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use crate::pool::{ArrayPool, Poolable};

use super::memory_owner::MemoryOwner;

enum Origin<'a, T: Poolable> {
    /// Caller-supplied memory, never returned anywhere
    Borrowed(&'a mut [T]),
    /// Memory rented from a pool
    Leased(MemoryOwner<T>),
    /// Disposed
    Released,
}

/// A view that owns its memory only when it had to rent it
///
/// Built either around a caller slice ([`borrowed`](Self::borrowed)) or a
/// fresh pool lease ([`rent`](Self::rent)). Exactly one origin is active.
/// Disposal is a no-op for borrowed memory and a pool return for leased
/// memory; in both cases the view is empty afterwards.
pub struct SpanOwner<'a, T: Poolable> {
    origin: Origin<'a, T>,
}

impl<'a, T: Poolable> SpanOwner<'a, T> {
    /// Adopt caller-owned memory
    pub fn borrowed(slice: &'a mut [T]) -> Self {
        Self {
            origin: Origin::Borrowed(slice),
        }
    }

    /// Rent `length` cleared elements from the shared pool
    pub fn rent(length: usize) -> Self {
        Self::rent_from(&ArrayPool::shared(), length)
    }

    /// Rent `length` cleared elements from a specific pool
    pub fn rent_from(pool: &Arc<ArrayPool<T>>, length: usize) -> Self {
        Self {
            origin: Origin::Leased(MemoryOwner::rent_from(pool, length, true)),
        }
    }

    /// True when backed by a pool lease
    pub fn is_leased(&self) -> bool {
        matches!(self.origin, Origin::Leased(_))
    }

    /// True once disposed
    pub fn is_disposed(&self) -> bool {
        matches!(self.origin, Origin::Released)
    }

    /// Number of elements in the view
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The viewed elements (empty after disposal)
    pub fn as_slice(&self) -> &[T] {
        match &self.origin {
            Origin::Borrowed(slice) => slice,
            Origin::Leased(owner) => owner.as_slice(),
            Origin::Released => &[],
        }
    }

    /// The viewed elements, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.origin {
            Origin::Borrowed(slice) => slice,
            Origin::Leased(owner) => owner.as_mut_slice(),
            Origin::Released => &mut [],
        }
    }

    /// Release the memory; the view is empty afterwards
    pub fn dispose(&mut self) {
        self.origin = Origin::Released;
    }
}

impl<T: Poolable> Deref for SpanOwner<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Poolable> DerefMut for SpanOwner<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T: Poolable> From<&'a mut [T]> for SpanOwner<'a, T> {
    fn from(slice: &'a mut [T]) -> Self {
        Self::borrowed(slice)
    }
}

impl<T: Poolable> fmt::Debug for SpanOwner<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self.origin {
            Origin::Borrowed(_) => "borrowed",
            Origin::Leased(_) => "leased",
            Origin::Released => "released",
        };
        f.debug_struct("SpanOwner")
            .field("origin", &origin)
            .field("len", &self.len())
            .finish()
    }
}

//! Growable writer over borrowed or pooled memory

use std::{fmt, ops::AddAssign, sync::Arc};

use tracing::{debug, trace};

use crate::{
    error::{Result, SlimError},
    owner::{MemoryOwner, SpanOwner},
    pool::{ArrayPool, Poolable},
};

/// Growth used when the writer has no capacity at all
pub const FALLBACK_GROWTH: usize = 256;

/// Upper bound on any capacity the writer will request
pub const MAX_CAPACITY: usize = isize::MAX as usize;

/// Current backing of a [`BufferWriter`]
///
/// Transitions only from `Initial` to `Grown`.
enum Backing<'a, T: Poolable> {
    Initial(SpanOwner<'a, T>),
    Grown(MemoryOwner<T>),
}

impl<T: Poolable> Backing<'_, T> {
    fn as_slice(&self) -> &[T] {
        match self {
            Backing::Initial(span) => span.as_slice(),
            Backing::Grown(owner) => owner.as_slice(),
        }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Backing::Initial(span) => span.as_mut_slice(),
            Backing::Grown(owner) => owner.as_mut_slice(),
        }
    }

    fn dispose(&mut self) {
        match self {
            Backing::Initial(span) => span.dispose(),
            Backing::Grown(owner) => owner.dispose(),
        }
    }
}

/// A forward-writing cursor over memory that grows on demand
///
/// The writer starts either on a caller-supplied slice ([`new`](Self::new))
/// or on a pool lease ([`with_capacity`](Self::with_capacity)). When a write
/// does not fit it rents a larger lease, copies the whole current backing
/// into it and releases the old one. After the first growth the caller's
/// slice is never written again.
///
/// Slices returned by [`acquire_span`](Self::acquire_span) and
/// [`written`](Self::written) borrow the writer, so none of them can outlive
/// a growth.
pub struct BufferWriter<'a, T: Poolable + Clone> {
    backing: Backing<'a, T>,
    /// Pool used for every growth
    pool: Arc<ArrayPool<T>>,
    /// Length of the starting buffer
    initial_len: usize,
    /// Growth applied on the first resize when it is large enough
    initial_min_grow: Option<usize>,
    position: usize,
}

impl<'a, T: Poolable + Clone> BufferWriter<'a, T> {
    /// Start writing into caller-owned memory
    pub fn new(initial: &'a mut [T]) -> Self {
        let initial_len = initial.len();
        Self {
            backing: Backing::Initial(SpanOwner::borrowed(initial)),
            pool: ArrayPool::shared(),
            initial_len,
            initial_min_grow: None,
            position: 0,
        }
    }

    /// Use `pool` for every future growth instead of the shared pool
    pub fn with_pool(mut self, pool: Arc<ArrayPool<T>>) -> Self {
        self.pool = pool;
        self
    }

    /// Set the growth used for the first resize
    ///
    /// While the writer still runs on its starting buffer, a resize that
    /// needs no more than `min_grow` extra elements grows to exactly
    /// `initial length + min_grow`.
    pub fn with_min_grow(mut self, min_grow: usize) -> Self {
        self.initial_min_grow = Some(min_grow);
        self
    }

    /// Total number of elements the current backing holds
    pub fn capacity(&self) -> usize {
        self.backing.as_slice().len()
    }

    /// Elements that fit before the next growth
    pub fn free_capacity(&self) -> usize {
        self.capacity() - self.position
    }

    /// Get the write cursor
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the write cursor anywhere in `[0, capacity]`
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        let capacity = self.capacity();
        if position > capacity {
            return Err(SlimError::out_of_range("position", position, capacity));
        }

        self.position = position;
        Ok(())
    }

    /// Rewind the cursor to the start without touching the data
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Elements `[0, position)`
    pub fn written(&self) -> &[T] {
        &self.backing.as_slice()[..self.position]
    }

    /// Elements `[0, position)`, mutably
    pub fn written_mut(&mut self) -> &mut [T] {
        let position = self.position;
        &mut self.backing.as_mut_slice()[..position]
    }

    /// The whole backing, including elements past the cursor
    pub fn buffer(&self) -> &[T] {
        self.backing.as_slice()
    }

    /// The whole backing, mutably
    pub fn buffer_mut(&mut self) -> &mut [T] {
        self.backing.as_mut_slice()
    }

    /// True once the writer has moved to a pool lease
    pub fn is_grown(&self) -> bool {
        matches!(self.backing, Backing::Grown(_))
    }

    /// Append one element
    pub fn add(&mut self, item: T) {
        self.ensure_free(1);
        let position = self.position;
        self.backing.as_mut_slice()[position] = item;
        self.position += 1;
    }

    /// Append a run of elements
    pub fn write(&mut self, items: &[T]) {
        self.ensure_free(items.len());
        let position = self.position;
        self.backing.as_mut_slice()[position..position + items.len()].clone_from_slice(items);
        self.position += items.len();
    }

    /// Get `length` writable elements at the cursor, growing if needed
    ///
    /// With `move_position` the cursor advances past the returned slice.
    pub fn acquire_span(&mut self, length: usize, move_position: bool) -> &mut [T] {
        self.ensure_free(length);
        let start = self.position;
        if move_position {
            self.position += length;
        }
        &mut self.backing.as_mut_slice()[start..start + length]
    }

    /// Move the cursor forward by `count`, growing if needed
    pub fn advance(&mut self, count: usize) {
        self.ensure_free(count);
        self.position += count;
    }

    /// Put the cursor at `position`, growing if it lies past the capacity
    pub fn advance_to(&mut self, position: usize) {
        let capacity = self.capacity();
        if position > capacity {
            self.resize(position - capacity);
        }
        self.position = position;
    }

    /// Copy `[from_start, from_start + from_size)` to `to_start`
    ///
    /// Grows first when the destination ends past the capacity. Overlapping
    /// ranges are handled like `memmove`. With `move_position` the cursor
    /// ends up at `to_start + from_size`.
    pub fn move_within(
        &mut self,
        from_start: usize,
        from_size: usize,
        to_start: usize,
        move_position: bool,
    ) -> Result<()> {
        let capacity = self.capacity();
        match from_start.checked_add(from_size) {
            Some(end) if end <= capacity => {}
            _ => {
                return Err(SlimError::out_of_range(
                    "from_start + from_size",
                    from_start.saturating_add(from_size),
                    capacity,
                ))
            }
        }

        if from_size == 0 || from_start == to_start {
            if to_start > capacity {
                self.resize(to_start - capacity);
            }
            return Ok(());
        }

        let to_end = match to_start.checked_add(from_size) {
            Some(end) if end <= MAX_CAPACITY => end,
            _ => {
                return Err(SlimError::out_of_range(
                    "to_start + from_size",
                    to_start.saturating_add(from_size),
                    MAX_CAPACITY,
                ))
            }
        };
        if to_end > capacity {
            self.resize(to_end - capacity);
        }

        let buffer = self.backing.as_mut_slice();
        if to_start < from_start {
            for offset in 0..from_size {
                buffer[to_start + offset] = buffer[from_start + offset].clone();
            }
        } else {
            for offset in (0..from_size).rev() {
                buffer[to_start + offset] = buffer[from_start + offset].clone();
            }
        }

        if move_position {
            self.position = to_end;
        }
        Ok(())
    }

    /// Overwrite the whole backing with `value`
    pub fn fill(&mut self, value: T) {
        self.backing.as_mut_slice().fill(value);
    }

    /// Release the backing; the writer is empty afterwards
    ///
    /// A disposed writer that is written to again rents a fresh lease.
    pub fn dispose(&mut self) {
        self.backing.dispose();
        self.position = 0;
    }

    fn ensure_free(&mut self, needed: usize) {
        let free = self.free_capacity();
        if needed > free {
            self.resize(needed - free);
        }
    }

    /// Grow so that at least `requested` more elements fit
    fn resize(&mut self, requested: usize) {
        let capacity = self.capacity();
        let new_capacity = match self.initial_min_grow {
            Some(min_grow) if !self.is_grown() && min_grow >= requested => {
                self.initial_len.saturating_add(min_grow)
            }
            _ => {
                let grow_by = if capacity > 0 {
                    requested.max(capacity)
                } else {
                    requested.max(FALLBACK_GROWTH)
                };
                capacity.saturating_add(grow_by)
            }
        }
        .max(capacity.saturating_add(requested))
        .min(MAX_CAPACITY);

        let mut grown = MemoryOwner::rent_from(&self.pool, new_capacity, false);
        {
            let target = grown.as_mut_slice();
            target[..capacity].clone_from_slice(self.backing.as_slice());
            target[capacity..]
                .iter_mut()
                .for_each(|slot| *slot = T::default());
        }

        if self.is_grown() {
            trace!(from = capacity, to = new_capacity, "buffer writer resized");
        } else {
            debug!(
                from = capacity,
                to = new_capacity,
                "buffer writer moved from initial buffer to pooled memory"
            );
        }

        // Replacing the backing drops the old one, returning any lease
        self.backing = Backing::Grown(grown);
    }
}

impl<T: Poolable + Clone> BufferWriter<'static, T> {
    /// Start on a pooled buffer of at least `min_size` elements
    ///
    /// The writer begins in the grown state.
    pub fn with_capacity(min_size: usize) -> Self {
        Self::with_capacity_in(&ArrayPool::shared(), min_size)
    }

    /// Start on a buffer rented from `pool`
    pub fn with_capacity_in(pool: &Arc<ArrayPool<T>>, min_size: usize) -> Self {
        Self {
            backing: Backing::Grown(MemoryOwner::rent_from(pool, min_size, true)),
            pool: Arc::clone(pool),
            initial_len: min_size,
            initial_min_grow: None,
            position: 0,
        }
    }
}

impl<T: Poolable + Clone> AddAssign<T> for BufferWriter<'_, T> {
    fn add_assign(&mut self, item: T) {
        self.add(item);
    }
}

impl<T: Poolable + Clone> AddAssign<&[T]> for BufferWriter<'_, T> {
    fn add_assign(&mut self, items: &[T]) {
        self.write(items);
    }
}

impl<T: Poolable + Clone> Extend<T> for BufferWriter<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Poolable + Clone> fmt::Debug for BufferWriter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferWriter")
            .field("position", &self.position)
            .field("capacity", &self.capacity())
            .field("grown", &self.is_grown())
            .field("initial_min_grow", &self.initial_min_grow)
            .finish()
    }
}

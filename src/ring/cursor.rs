//! Logical-to-physical index bookkeeping shared by the ring buffers

use super::two_span::{TwoSpan, TwoSpanMut};

/// Start and count of a ring over `capacity` physical slots
///
/// Logical index `i` lives at physical `(start + i) % capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RingCursor {
    capacity: usize,
    start: usize,
    count: usize,
}

impl RingCursor {
    /// `capacity` must be non-zero
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            start: 0,
            count: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[cfg(test)]
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    /// Claim the slot for a new element, evicting the oldest when full
    pub(crate) fn push(&mut self) -> usize {
        let slot = (self.start + self.count) % self.capacity;
        if self.is_full() {
            self.start = (self.start + 1) % self.capacity;
        } else {
            self.count += 1;
        }
        slot
    }

    pub(crate) fn physical(&self, index: usize) -> Option<usize> {
        (index < self.count).then(|| (self.start + index) % self.capacity)
    }

    pub(crate) fn reset(&mut self) {
        self.start = 0;
        self.count = 0;
    }

    /// Physical range of the first segment and length of the wrapped one
    fn segments(&self) -> (usize, usize, usize) {
        let first_end = (self.start + self.count).min(self.capacity);
        let wrapped = self.start + self.count - first_end;
        (self.start, first_end, wrapped)
    }

    pub(crate) fn two_span<'a, T>(&self, storage: &'a [T]) -> TwoSpan<'a, T> {
        let (start, first_end, wrapped) = self.segments();
        TwoSpan::new(&storage[start..first_end], &storage[..wrapped])
    }

    pub(crate) fn two_span_mut<'a, T>(&self, storage: &'a mut [T]) -> TwoSpanMut<'a, T> {
        let (start, first_end, wrapped) = self.segments();
        let (head, tail) = storage.split_at_mut(start);
        TwoSpanMut::new(&mut tail[..first_end - start], &mut head[..wrapped])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_wraps_and_evicts() {
        let mut cursor = RingCursor::new(3);
        assert_eq!(cursor.push(), 0);
        assert_eq!(cursor.push(), 1);
        assert_eq!(cursor.push(), 2);
        assert!(cursor.is_full());

        assert_eq!(cursor.push(), 0);
        assert_eq!(cursor.start(), 1);
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.physical(0), Some(1));
        assert_eq!(cursor.physical(2), Some(0));
        assert_eq!(cursor.physical(3), None);
    }

    #[test]
    fn test_segments() {
        let storage = [4, 2, 3];
        let mut cursor = RingCursor::new(3);
        for _ in 0..4 {
            cursor.push();
        }

        let span = cursor.two_span(&storage);
        assert_eq!(span.first(), &[2, 3]);
        assert_eq!(span.second(), &[4]);

        cursor.reset();
        assert!(cursor.two_span(&storage).is_empty());
    }
}

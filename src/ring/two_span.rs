//! Two-segment views over wrapped ring contents

use std::{
    iter::Chain,
    ops::{Index, IndexMut},
    slice,
};

/// Iterator over a [`TwoSpan`]
pub type Iter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// Mutable iterator over a [`TwoSpanMut`]
pub type IterMut<'a, T> = Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>;

/// A logical sequence stored as two slices, `first` then `second`
///
/// `second` is empty unless the sequence wraps past the physical end of a
/// ring buffer.
#[derive(Debug, PartialEq, Eq)]
pub struct TwoSpan<'a, T> {
    first: &'a [T],
    second: &'a [T],
}

impl<T> Clone for TwoSpan<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TwoSpan<'_, T> {}

impl<'a, T> TwoSpan<'a, T> {
    /// Join two segments into one view
    pub fn new(first: &'a [T], second: &'a [T]) -> Self {
        Self { first, second }
    }

    /// An empty view
    pub fn empty() -> Self {
        Self::new(&[], &[])
    }

    /// Leading segment
    pub fn first(&self) -> &'a [T] {
        self.first
    }

    /// Trailing segment, empty unless wrapped
    pub fn second(&self) -> &'a [T] {
        self.second
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Check if both segments are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the view needs both segments
    pub fn is_split(&self) -> bool {
        !self.second.is_empty()
    }

    /// Element at logical `index`
    pub fn get(&self, index: usize) -> Option<&'a T> {
        match index.checked_sub(self.first.len()) {
            None => self.first.get(index),
            Some(second_index) => self.second.get(second_index),
        }
    }

    /// Iterate in logical order
    pub fn iter(&self) -> Iter<'a, T> {
        self.first.iter().chain(self.second.iter())
    }

    /// Copy both segments into one vector
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.first);
        out.extend_from_slice(self.second);
        out
    }
}

impl<T> Index<usize> for TwoSpan<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {} out of range for TwoSpan of length {}", index, self.len()),
        }
    }
}

impl<'a, T> IntoIterator for TwoSpan<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable counterpart of [`TwoSpan`]
#[derive(Debug, PartialEq, Eq)]
pub struct TwoSpanMut<'a, T> {
    first: &'a mut [T],
    second: &'a mut [T],
}

impl<'a, T> TwoSpanMut<'a, T> {
    /// Join two mutable segments into one view
    pub fn new(first: &'a mut [T], second: &'a mut [T]) -> Self {
        Self { first, second }
    }

    /// Leading segment
    pub fn first(&mut self) -> &mut [T] {
        self.first
    }

    /// Trailing segment, empty unless wrapped
    pub fn second(&mut self) -> &mut [T] {
        self.second
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Check if both segments are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable element at logical `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match index.checked_sub(self.first.len()) {
            None => self.first.get_mut(index),
            Some(second_index) => self.second.get_mut(second_index),
        }
    }

    /// Iterate mutably in logical order
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.first.iter_mut().chain(self.second.iter_mut())
    }

    /// Reborrow as a shared view
    pub fn as_two_span(&self) -> TwoSpan<'_, T> {
        TwoSpan::new(&*self.first, &*self.second)
    }
}

impl<T> Index<usize> for TwoSpanMut<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match index.checked_sub(self.first.len()) {
            None => &self.first[index],
            Some(second_index) if second_index < self.second.len() => &self.second[second_index],
            Some(_) => panic!("index {} out of range for TwoSpanMut of length {}", index, len),
        }
    }
}

impl<T> IndexMut<usize> for TwoSpanMut<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {} out of range for TwoSpanMut of length {}", index, len),
        }
    }
}

impl<'a, T> IntoIterator for TwoSpanMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.first.iter_mut().chain(self.second.iter_mut())
    }
}

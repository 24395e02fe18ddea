//! A bounds-checked resizable array backing both hash maps.

use std::fmt;
use thiserror::Error;

/// Errors reported by [`DynamicArray`] accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DynamicArrayError {
    /// The index does not address an element of the array
    #[error("index {index} is out of range for an array of length {length}")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The array length at the time of the access
        length: usize,
    },
}

/// A contiguous growable array with O(1) amortized append and O(1) indexed access.
///
/// Unlike slice indexing, out-of-range accesses never panic: they return
/// [`DynamicArrayError::IndexOutOfRange`], which the open-addressing cursor relies on to
/// detect the end of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicArray<T> {
    /// The stored elements
    data: Vec<T>,
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicArray<T> {
    /// Creates an empty array
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an array of `length` elements, each produced by `fill`
    pub fn filled_with<F>(length: usize, fill: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut data = Vec::with_capacity(length);
        data.resize_with(length, fill);
        Self { data }
    }

    /// Appends an element to the end of the array
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    /// Returns a reference to the element at `index`
    ///
    /// # Errors
    ///
    /// Returns [`DynamicArrayError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get(&self, index: usize) -> Result<&T, DynamicArrayError> {
        let length = self.data.len();
        self.data.get(index).ok_or(DynamicArrayError::IndexOutOfRange { index, length })
    }

    /// Returns a mutable reference to the element at `index`
    ///
    /// # Errors
    ///
    /// Returns [`DynamicArrayError::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, DynamicArrayError> {
        let length = self.data.len();
        self.data.get_mut(index).ok_or(DynamicArrayError::IndexOutOfRange { index, length })
    }

    /// Replaces the element at `index`, returning the previous one
    ///
    /// # Errors
    ///
    /// Returns [`DynamicArrayError::IndexOutOfRange`] if `index >= self.len()`; the array is
    /// left unchanged.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, DynamicArrayError> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Returns the number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over the elements in index order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over the elements in index order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Views the elements as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for DynamicArray<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { data: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T: fmt::Debug> fmt::Display for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.data).finish()
    }
}

//! In-memory dictionaries for the fixed-width value domains.
//!
//! A `PlainDictionary` is handed an already-decoded table of values; building
//! that table from a dictionary page is the column reader's job. Once built it
//! is never mutated, so a single instance can back every decoder scanning the
//! column, on any thread.

use std::mem::size_of;

use crate::traits::Dictionary;

#[derive(Debug, Clone, PartialEq)]
pub struct PlainDictionary<T> {
    values: Vec<T>,
}

/// Timestamps as epoch milliseconds.
pub type TimestampDictionary = PlainDictionary<i64>;
pub type Int32Dictionary = PlainDictionary<i32>;
pub type Int64Dictionary = PlainDictionary<i64>;
pub type Float64Dictionary = PlainDictionary<f64>;

impl<T: Copy> PlainDictionary<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Copy> From<Vec<T>> for PlainDictionary<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

impl<T: Copy> Dictionary for PlainDictionary<T> {
    type Value = T;

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn get(&self, code: u32) -> Option<T> {
        self.values.get(code as usize).copied()
    }

    fn retained_size_in_bytes(&self) -> usize {
        size_of::<Self>() + self.values.capacity() * size_of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_in_and_out_of_bounds() {
        let dictionary = TimestampDictionary::new(vec![1_700_000_000_000, 0, -5]);
        assert_eq!(dictionary.len(), 3);
        assert!(!dictionary.is_empty());
        assert_eq!(dictionary.get(0), Some(1_700_000_000_000));
        assert_eq!(dictionary.get(2), Some(-5));
        assert_eq!(dictionary.get(3), None);
        assert_eq!(dictionary.get(u32::MAX), None);
    }

    #[test]
    fn test_retained_size_counts_values() {
        let empty = Int32Dictionary::new(Vec::new());
        assert!(empty.is_empty());
        let base = empty.retained_size_in_bytes();

        let dictionary: Int32Dictionary = vec![1, 2, 3, 4].into();
        assert!(dictionary.retained_size_in_bytes() >= base + 4 * size_of::<i32>());
    }
}

//! Array-backed ordered container with binary-search lookups.

use super::{ContainerError, OrderedContainer};
use std::borrow::Borrow;

const DEFAULT_CAPACITY: usize = 10;
const GROWTH_INCREMENT: usize = 10;

/// Contiguous sorted container.
///
/// # Invariants
/// - `items` is sorted ascending at all times; `index_of`/`contains` rely on
///   it for binary search.
/// - Capacity grows by a fixed increment when full and never shrinks.
#[derive(Debug, Clone)]
pub struct SortedArrayList<T> {
    items: Vec<T>,
}

impl<T: Ord> SortedArrayList<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Current backing capacity.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn grow_if_full(&mut self) {
        if self.items.len() == self.items.capacity() {
            self.items.reserve_exact(GROWTH_INCREMENT);
        }
    }
}

impl<T: Ord> Default for SortedArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> OrderedContainer<T> for SortedArrayList<T> {
    type Iter<'a>
        = std::slice::Iter<'a, T>
    where
        T: 'a;

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        // Linear equality scan; `Eq` may be coarser than structural equality.
        if self.items.iter().any(|existing| *existing == item) {
            return Err(ContainerError::Duplicate);
        }
        self.grow_if_full();

        let position = self
            .items
            .iter()
            .position(|existing| *existing >= item)
            .unwrap_or(self.items.len());
        self.items.insert(position, item);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    fn remove(&mut self, index: usize) -> Result<T, ContainerError> {
        if index >= self.items.len() {
            return Err(ContainerError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items
            .binary_search_by(|candidate| Borrow::<Q>::borrow(candidate).cmp(item))
            .ok()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{SortedArrayList, DEFAULT_CAPACITY, GROWTH_INCREMENT};
    use crate::collections::{ContainerError, OrderedContainer};

    #[test]
    fn add_keeps_ascending_order() {
        let mut list = SortedArrayList::new();
        for value in ["delta", "alpha", "charlie", "bravo"] {
            list.add(value).expect("distinct values should insert");
        }
        assert_eq!(list.as_slice(), &["alpha", "bravo", "charlie", "delta"]);
    }

    #[test]
    fn add_rejects_duplicate_without_changing_len() {
        let mut list = SortedArrayList::new();
        list.add(3).unwrap();
        list.add(1).unwrap();
        assert_eq!(list.add(3), Err(ContainerError::Duplicate));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn grows_by_fixed_increment_and_never_shrinks() {
        let mut list = SortedArrayList::new();
        for value in 0..DEFAULT_CAPACITY {
            list.add(value).unwrap();
        }
        let full_capacity = list.capacity();
        list.add(DEFAULT_CAPACITY).unwrap();
        assert!(list.capacity() >= full_capacity + GROWTH_INCREMENT);

        let grown = list.capacity();
        while !list.is_empty() {
            list.remove(0).unwrap();
        }
        assert_eq!(list.capacity(), grown);
    }

    #[test]
    fn remove_out_of_range_reports_bounds() {
        let mut list = SortedArrayList::<i32>::new();
        assert_eq!(
            list.remove(0),
            Err(ContainerError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn binary_search_finds_every_element() {
        let mut list = SortedArrayList::new();
        for value in [40, 10, 30, 20, 50] {
            list.add(value).unwrap();
        }
        assert_eq!(list.index_of(&10), Some(0));
        assert_eq!(list.index_of(&50), Some(4));
        assert_eq!(list.index_of(&35), None);
        assert!(list.contains(&30));
    }
}

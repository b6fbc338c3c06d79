//! Duplicate-free ordered containers backing every entity collection.
//!
//! # Responsibility
//! - Keep elements in ascending order by `T: Ord`.
//! - Reject elements equal (by `T: Eq`) to one already stored.
//!
//! # Invariants
//! - Iteration order is ascending for every implementation.
//! - A rejected `add` never changes `len()`.
//! - `T` is non-nullable, so an "absent" element cannot reach `add`; the only
//!   rejection reason for a present element is `ContainerError::Duplicate`.

use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod array_list;
mod linked_list;

pub use array_list::SortedArrayList;
pub use linked_list::SortedLinkedList;

/// Errors returned by ordered container operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// An equal element is already stored.
    Duplicate,
    /// Positional access outside `0..len`.
    IndexOutOfBounds { index: usize, len: usize },
}

impl Display for ContainerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate elements are not allowed"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for length {len}")
            }
        }
    }
}

impl Error for ContainerError {}

/// Sorted, duplicate-free container contract shared by both implementations.
///
/// Lookups accept any borrowed form of `T` (like the std collections), so an
/// `OrderedContainer<Rc<Activity>>` can be queried with a plain `&Activity`.
pub trait OrderedContainer<T: Ord> {
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    /// Inserts `item` at its sorted position.
    fn add(&mut self, item: T) -> Result<(), ContainerError>;

    /// Returns the element at `index`, if any.
    fn get(&self, index: usize) -> Option<&T>;

    /// Removes and returns the element at `index`.
    fn remove(&mut self, index: usize) -> Result<T, ContainerError>;

    fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index_of(item).is_some()
    }

    fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates in ascending order.
    fn iter(&self) -> Self::Iter<'_>;
}

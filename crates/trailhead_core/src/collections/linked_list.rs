//! Singly-linked ordered container with linear lookups.

use super::{ContainerError, OrderedContainer};
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// Sorted singly-linked container.
///
/// `head` links to the first (smallest) node and is `None` when empty.
/// Size, lookup, insertion and positional access walk the chain with a
/// cursor, so every operation is O(n) time and O(1) stack.
pub struct SortedLinkedList<T> {
    head: Link<T>,
}

impl<T: Ord> SortedLinkedList<T> {
    pub fn new() -> Self {
        Self { head: None }
    }
}

impl<T: Ord> Default for SortedLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for SortedLinkedList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(Iter { next: self.head.as_deref() }).finish()
    }
}

impl<T> Drop for SortedLinkedList<T> {
    fn drop(&mut self) {
        // Unlink iteratively; the default recursive drop can overflow the
        // stack on long chains.
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

/// Walks forward `steps` links, stopping early at the tail.
fn link_at<T>(head: &mut Link<T>, steps: usize) -> &mut Link<T> {
    let mut link = head;
    for _ in 0..steps {
        match link {
            Some(node) => link = &mut node.next,
            None => break,
        }
    }
    link
}

/// Splices `item` before the first node that is not less than it.
fn insert_sorted<T: Ord>(head: &mut Link<T>, item: T) {
    let position = Iter {
        next: head.as_deref(),
    }
    .take_while(|existing| **existing < item)
    .count();
    let link = link_at(head, position);
    let next = link.take();
    *link = Some(Box::new(Node { value: item, next }));
}

fn remove_at<T>(head: &mut Link<T>, index: usize) -> Option<T> {
    let link = link_at(head, index);
    let node = link.take()?;
    let Node { value, next } = *node;
    *link = next;
    Some(value)
}

/// Borrowing iterator over a linked container, in ascending order.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

impl<T: Ord> OrderedContainer<T> for SortedLinkedList<T> {
    type Iter<'a>
        = Iter<'a, T>
    where
        T: 'a;

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        if self.iter().any(|existing| *existing == item) {
            return Err(ContainerError::Duplicate);
        }
        insert_sorted(&mut self.head, item);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    fn remove(&mut self, index: usize) -> Result<T, ContainerError> {
        let len = self.len();
        if index >= len {
            return Err(ContainerError::IndexOutOfBounds { index, len });
        }
        remove_at(&mut self.head, index).ok_or(ContainerError::IndexOutOfBounds { index, len })
    }

    fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.iter().position(|existing| Borrow::<Q>::borrow(existing) == item)
    }

    fn len(&self) -> usize {
        self.iter().count()
    }

    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

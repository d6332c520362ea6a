//! Index-addressed node storage shared by the skiplist and the zip tree.
//!
//! Nodes never hold references to one another. Instead, every link is the
//! index of a slot in the owning structure's [`Arena`], which means that
//! splicing, zipping and unzipping only ever reassign indices. Freed slots are
//! recycled by later insertions.

use std::ops::{Index, IndexMut};

/// A link to another node; `None` marks the end of a chain or an empty
/// subtree.
pub(crate) type Link = Option<usize>;

/// A vector of node slots with a free list.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    /// Node storage. A `None` slot is vacant and its index is on `free`.
    slots: Vec<Option<T>>,
    /// Indices of vacant slots, reused before the vector grows.
    free: Vec<usize>,
}

impl<T> Arena<T> {
    /// Create an empty arena.
    #[inline]
    pub(crate) const fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `value` and return the index of its slot.
    #[inline]
    pub(crate) fn insert(&mut self, value: T) -> usize {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(value);
                return index;
            }
        }
        self.slots.push(Some(value));
        self.slots.len() - 1
    }

    /// Take the value out of slot `index`, marking the slot vacant.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant. Every caller only removes nodes
    /// which it has just unlinked, so this indicates a corrupted structure.
    #[inline]
    pub(crate) fn remove(&mut self, index: usize) -> T {
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(value) => {
                self.free.push(index);
                value
            }
            None => unreachable!("removed vacant arena slot {index}"),
        }
    }

    /// Drop every node and forget all slots.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl<T> Default for Arena<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.slots.get(index) {
            Some(Some(value)) => value,
            _ => unreachable!("dangling arena index {index}"),
        }
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.slots.get_mut(index) {
            Some(Some(value)) => value,
            _ => unreachable!("dangling arena index {index}"),
        }
    }
}

//! A zip tree is a binary search tree in which every node carries a random
//! *rank*, and the shape of the tree is fixed entirely by the keys and their
//! ranks:
//!
//! - keys are in symmetric (in-order) order;
//! - ranks never increase going down the tree, and a child sharing its
//!   parent's rank has a larger key (so it is always a right child).
//!
//! Insertion *unzips* the path below the new node into the parts smaller and
//! larger than its key, and removal *zips* the two subtrees of the removed
//! node back into a single path. Ranks are drawn from a geometric distribution
//! with $p = 1/2$, which gives the tree expected logarithmic depth.
//!
//! ```text
//!            (5, r2)
//!           /       \
//!      (3, r1)     (8, r1)
//!      /
//!  (1, r0)
//! ```

use std::{borrow::Borrow, cmp::Ordering, fmt, mem};

use tracing::trace;

use crate::{
    arena::{Arena, Link},
    error::Error,
    level_generator::{Geometric, LevelGenerator},
};

/// Probability that a rank is incremented once more.
const P: f64 = 0.5;

/// Ranks are truncated at this many levels, which only happens with
/// probability `$2^{-64}$`.
#[expect(clippy::as_conversions, reason = "u32 always fits in usize")]
const TOTAL_RANKS: usize = usize::BITS as usize;

// ////////////////////////////////////////////////////////////////////////////
// ZipNode
// ////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
struct ZipNode<K, V> {
    key: K,
    value: V,
    rank: usize,
    left: Link,
    right: Link,
}

impl<K, V> ZipNode<K, V> {
    fn new(key: K, value: V, rank: usize) -> Self {
        ZipNode {
            key,
            value,
            rank,
            left: None,
            right: None,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// ZipTree
// ////////////////////////////////////////////////////////////////////////////

/// An ordered map implemented as a zip tree.
///
/// # Examples
///
/// ```
/// use rankmaps::ZipTree;
///
/// let mut tree = ZipTree::new();
/// tree.insert_with_rank(5, "a", 2);
/// tree.insert_with_rank(3, "b", 1);
/// tree.insert_with_rank(8, "c", 1);
/// tree.insert_with_rank(1, "d", 0);
///
/// assert_eq!(tree.get(&3), Some(&"b"));
/// assert_eq!(tree.depth(&1), Ok(2));
/// assert_eq!(tree.height(), Some(2));
///
/// assert_eq!(tree.remove(&5), Ok("a"));
/// assert_eq!(tree.get(&5), None);
/// ```
#[derive(Clone)]
pub struct ZipTree<K, V> {
    /// Node storage. Links are indices into this arena.
    nodes: Arena<ZipNode<K, V>>,
    root: Link,
    len: usize,
    rank_generator: Geometric,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> ZipTree<K, V> {
    /// Create an empty zip tree whose ranks are seeded from the thread-local
    /// random number generator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        match Geometric::new(TOTAL_RANKS, P) {
            Ok(rank_generator) => Self::with_generator(rank_generator),
            Err(_) => unreachable!("the default configuration is valid"),
        }
    }

    /// Create an empty zip tree whose sequence of sampled ranks is entirely
    /// determined by `seed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::ZipTree;
    ///
    /// let a: ZipTree<_, _> = {
    ///     let mut tree = ZipTree::with_seed(7);
    ///     tree.extend((0..100).map(|x| (x, x)));
    ///     tree
    /// };
    /// let mut b = ZipTree::with_seed(7);
    /// b.extend((0..100).map(|x| (x, x)));
    /// assert_eq!(a.height(), b.height());
    /// ```
    #[inline]
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        match Geometric::with_seed(TOTAL_RANKS, P, seed) {
            Ok(rank_generator) => Self::with_generator(rank_generator),
            Err(_) => unreachable!("the default configuration is valid"),
        }
    }

    fn with_generator(rank_generator: Geometric) -> Self {
        ZipTree {
            nodes: Arena::new(),
            root: None,
            len: 0,
            rank_generator,
        }
    }

    /// Returns the number of entries in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the tree, removing all entries.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the number of edges on the longest path from the root to a
    /// leaf, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::ZipTree;
    ///
    /// let mut tree = ZipTree::new();
    /// assert_eq!(tree.height(), None);
    /// tree.insert(1, ());
    /// assert_eq!(tree.height(), Some(0));
    /// ```
    #[inline]
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        let mut height = None;
        while let Some((index, depth)) = stack.pop() {
            height = height.max(Some(depth));
            let node = &self.nodes[index];
            stack.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        height
    }

    /// Returns the rank of the root, which is the highest rank in the tree.
    #[inline]
    #[must_use]
    pub fn max_rank(&self) -> Option<usize> {
        self.root.map(|root| self.nodes[root].rank)
    }

    /// Visit every entry in key order, together with its rank.
    ///
    /// The traversal uses an explicit stack, so degenerate trees do not
    /// exhaust the call stack.
    pub(crate) fn walk_in_order<'a>(&'a self, mut f: impl FnMut(&'a K, &'a V, usize)) {
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes[index].left;
            }
            let Some(index) = stack.pop() else {
                break;
            };
            let node = &self.nodes[index];
            f(&node.key, &node.value, node.rank);
            current = node.right;
        }
    }

    /// The child slot of `parent` on `side` (left for `Less`, right
    /// otherwise), or the root slot if there is no parent.
    fn slot_mut(&mut self, parent: Link, side: Ordering) -> &mut Link {
        match parent {
            None => &mut self.root,
            Some(index) if side.is_lt() => &mut self.nodes[index].left,
            Some(index) => &mut self.nodes[index].right,
        }
    }
}

impl<K, V> ZipTree<K, V>
where
    K: Ord,
{
    /// Insert `value` under `key` with a freshly sampled rank.
    ///
    /// If the key is already present, its value is replaced and the old value
    /// returned. No rank is sampled in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::ZipTree;
    ///
    /// let mut tree = ZipTree::new();
    /// assert_eq!(tree.insert(1, "Hello"), None);
    /// assert_eq!(tree.insert(1, "World"), Some("Hello"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.find(&key) {
            return Some(mem::replace(&mut self.nodes[index].value, value));
        }
        let rank = self.rank_generator.level();
        self.insert_new(key, value, rank);
        None
    }

    /// Insert `value` under `key` with the given `rank`.
    ///
    /// If the key is already present, its value is replaced and the old value
    /// returned; the node keeps its original rank.
    #[inline]
    pub fn insert_with_rank(&mut self, key: K, value: V, rank: usize) -> Option<V> {
        if let Some(index) = self.find(&key) {
            return Some(mem::replace(&mut self.nodes[index].value, value));
        }
        self.insert_new(key, value, rank);
        None
    }

    /// Splice a node for a key known to be absent.
    fn insert_new(&mut self, key: K, value: V, rank: usize) {
        // Descend while the new node belongs below the current one: it has a
        // lower rank, or the same rank and a larger key.
        let mut parent: Link = None;
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            let side = key.cmp(&node.key);
            match (rank.cmp(&node.rank), side) {
                (Ordering::Less, _) | (Ordering::Equal, Ordering::Greater) => {
                    parent = Some(index);
                    current = if side.is_lt() { node.left } else { node.right };
                }
                _ => break,
            }
        }

        let side = parent.map_or(Ordering::Equal, |p| key.cmp(&self.nodes[p].key));
        let new = self.nodes.insert(ZipNode::new(key, value, rank));
        *self.slot_mut(parent, side) = Some(new);
        self.len += 1;
        trace!(rank, len = self.len, "inserted zip tree node");

        let Some(displaced) = current else {
            return;
        };
        // The displaced subtree hangs on the side of its own root; the unzip
        // below fixes up the other side.
        if self.nodes[new].key < self.nodes[displaced].key {
            self.nodes[new].right = Some(displaced);
        } else {
            self.nodes[new].left = Some(displaced);
        }
        self.unzip(new, displaced);
    }

    /// Split the subtree rooted at `current` (already hung below `new`) into
    /// the keys smaller and larger than `new`'s key.
    ///
    /// The search path for `new`'s key is walked in alternating runs of
    /// smaller keys (following right links) and larger keys (following left
    /// links). At the end of each run, the first node of the next run is
    /// installed below the node where the previous run of the opposite kind
    /// ended.
    fn unzip(&mut self, new: usize, current: usize) {
        let mut current = Some(current);
        let mut previous = new;
        while let Some(start) = current {
            let anchor = previous;
            let smaller = self.nodes[start].key < self.nodes[new].key;
            current = Some(start);
            while let Some(index) = current {
                let node = &self.nodes[index];
                if (node.key < self.nodes[new].key) != smaller {
                    break;
                }
                previous = index;
                current = if smaller { node.right } else { node.left };
            }

            // Right after `new` itself, the side to fill is the one opposite
            // to the run just consumed.
            let fill_left = if anchor == new {
                self.nodes[previous].key > self.nodes[new].key
            } else {
                self.nodes[anchor].key > self.nodes[new].key
            };
            if fill_left {
                self.nodes[anchor].left = current;
            } else {
                self.nodes[anchor].right = current;
            }
        }
    }

    /// Remove the entry for `key`, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key is not present; the tree is left
    /// untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::{Error, ZipTree};
    ///
    /// let mut tree = ZipTree::new();
    /// tree.insert(1, "a");
    /// assert_eq!(tree.remove(&1), Ok("a"));
    /// assert_eq!(tree.remove(&1), Err(Error::NotFound));
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent: Link = None;
        let mut current = self.root;
        let index = loop {
            let Some(index) = current else {
                return Err(Error::NotFound);
            };
            let node = &self.nodes[index];
            match Ord::cmp(key, node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => break index,
            }
            parent = Some(index);
        };

        let (left, right) = (self.nodes[index].left, self.nodes[index].right);
        let replacement = match (left, right) {
            (None, only) | (only, None) => only,
            (Some(l), Some(r)) => {
                if self.nodes[l].rank >= self.nodes[r].rank {
                    Some(l)
                } else {
                    Some(r)
                }
            }
        };

        let side = parent.map_or(Ordering::Equal, |p| {
            Ord::cmp(key, self.nodes[p].key.borrow())
        });
        *self.slot_mut(parent, side) = replacement;
        self.zip(left, right);

        self.len -= 1;
        trace!(len = self.len, "removed zip tree node");
        Ok(self.nodes.remove(index).value)
    }

    /// Merge the subtrees `left` and `right`, all of whose keys are smaller
    /// than those of `right`, into a single subtree rooted at whichever has
    /// the higher rank (`left` on ties).
    ///
    /// The right spine of `left` and the left spine of `right` are interleaved
    /// by rank; every other link is untouched.
    fn zip(&mut self, mut left: Link, mut right: Link) {
        while let (Some(l), Some(r)) = (left, right) {
            if self.nodes[l].rank >= self.nodes[r].rank {
                let mut last = l;
                while let Some(index) = left {
                    if self.nodes[index].rank < self.nodes[r].rank {
                        break;
                    }
                    last = index;
                    left = self.nodes[index].right;
                }
                self.nodes[last].right = Some(r);
            } else {
                let mut last = r;
                while let Some(index) = right {
                    if self.nodes[l].rank >= self.nodes[index].rank {
                        break;
                    }
                    last = index;
                    right = self.nodes[index].left;
                }
                self.nodes[last].left = Some(l);
            }
        }
    }

    /// Returns a reference to the value stored under `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|index| &self.nodes[index].value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(&mut self.nodes[index].value)
    }

    /// Returns `true` if the tree contains an entry for `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the rank of the node holding `key`.
    #[inline]
    pub fn rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|index| self.nodes[index].rank)
    }

    /// Returns the number of edges between the root and the node holding
    /// `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key is not present.
    #[inline]
    pub fn depth<Q>(&self, key: &Q) -> Result<usize, Error>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.descend(key).map(|(_, depth)| depth).ok_or(Error::NotFound)
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.descend(key).map(|(index, _)| index)
    }

    /// Standard binary search descent, returning the matching node and its
    /// depth.
    fn descend<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        let mut depth = 0;
        while let Some(index) = current {
            let node = &self.nodes[index];
            current = match Ord::cmp(key, node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some((index, depth)),
            };
            depth += 1;
        }
        None
    }

    /// Checks the integrity of the tree.
    ///
    /// Keys must be strictly increasing in order, ranks must not increase
    /// from parent to child (with equal-rank children holding larger keys),
    /// and the recorded length must match the nodes reachable from the root.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken invariant.
    #[doc(hidden)]
    #[inline]
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        let mut count = 0_usize;
        let mut previous: Option<&K> = None;
        let mut ordered = true;
        self.walk_in_order(|key, _, _| {
            count += 1;
            if previous.is_some_and(|p| p >= key) {
                ordered = false;
            }
            previous = Some(key);
        });
        if !ordered {
            return Err("keys are not strictly increasing in order");
        }
        if count != self.len || self.nodes.len() != self.len {
            return Err("length does not match the nodes present");
        }

        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            let parent = &self.nodes[index];
            for child in [parent.left, parent.right].into_iter().flatten() {
                let node = &self.nodes[child];
                let heap_ordered = match parent.rank.cmp(&node.rank) {
                    Ordering::Greater => true,
                    Ordering::Equal => parent.key < node.key,
                    Ordering::Less => false,
                };
                if !heap_ordered {
                    return Err("a child outranks its parent");
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V> Default for ZipTree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for ZipTree<K, V>
where
    K: Ord,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ZipTree<K, V>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V> fmt::Debug for ZipTree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.walk_in_order(|key, value, _| {
            map.entry(key, value);
        });
        map.finish()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rand::prelude::*;
    use rstest::rstest;

    use super::ZipTree;
    use crate::error::Error;

    fn check<K: Ord, V>(tree: &ZipTree<K, V>) {
        if let Err(msg) = tree.check_invariants() {
            panic!("{msg}");
        }
    }

    /// Keys in pre-order, which pins down the exact shape of the tree.
    fn preorder<K: Copy, V>(tree: &ZipTree<K, V>) -> Vec<K> {
        let mut keys = Vec::new();
        let mut stack: Vec<usize> = tree.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            let node = &tree.nodes[index];
            keys.push(node.key);
            stack.extend(node.right);
            stack.extend(node.left);
        }
        keys
    }

    fn scenario() -> ZipTree<i32, &'static str> {
        let mut tree = ZipTree::new();
        tree.insert_with_rank(5, "a", 2);
        tree.insert_with_rank(3, "b", 1);
        tree.insert_with_rank(8, "c", 1);
        tree.insert_with_rank(1, "d", 0);
        tree
    }

    #[test]
    fn scenario_queries() -> Result<()> {
        let tree = scenario();
        check(&tree);
        assert_eq!(tree.len(), 4);
        assert_eq!(preorder(&tree), vec![5, 3, 1, 8]);
        assert_eq!(tree.get(&3), Some(&"b"));
        assert_eq!(tree.depth(&5)?, 0);
        assert_eq!(tree.depth(&3)?, 1);
        assert_eq!(tree.depth(&1)?, 2);
        assert_eq!(tree.height(), Some(2));
        assert_eq!(tree.max_rank(), Some(2));
        assert_eq!(tree.rank(&8), Some(1));
        Ok(())
    }

    #[test]
    fn scenario_remove_root() -> Result<()> {
        let mut tree = scenario();
        assert_eq!(tree.remove(&5)?, "a");
        check(&tree);
        assert_eq!(tree.get(&5), None);
        assert_eq!(tree.len(), 3);
        // 3 and 8 tie on rank, so the left subtree stays on top.
        assert_eq!(preorder(&tree), vec![3, 1, 8]);
        assert_eq!(tree.get(&1), Some(&"d"));
        assert_eq!(tree.get(&3), Some(&"b"));
        assert_eq!(tree.get(&8), Some(&"c"));
        Ok(())
    }

    #[test]
    fn empty() {
        let mut tree: ZipTree<i32, ()> = ZipTree::new();
        check(&tree);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
        assert_eq!(tree.max_rank(), None);
        assert_eq!(tree.get(&1), None);
        assert_eq!(tree.depth(&1), Err(Error::NotFound));
        assert_eq!(tree.remove(&1), Err(Error::NotFound));
    }

    #[test]
    fn single() -> Result<()> {
        let mut tree = ZipTree::new();
        tree.insert(1, 'a');
        assert_eq!(tree.height(), Some(0));
        assert_eq!(tree.depth(&1)?, 0);
        assert_eq!(tree.remove(&1)?, 'a');
        assert_eq!(tree.height(), None);
        check(&tree);
        Ok(())
    }

    #[test]
    fn remove_missing_leaves_tree() {
        let mut tree = scenario();
        assert_eq!(tree.remove(&4), Err(Error::NotFound));
        assert_eq!(tree.len(), 4);
        assert_eq!(preorder(&tree), vec![5, 3, 1, 8]);
        check(&tree);
    }

    #[test]
    fn insert_existing() {
        let mut tree = scenario();
        assert_eq!(tree.insert_with_rank(3, "x", 7), Some("b"));
        assert_eq!(tree.insert(8, "y"), Some("c"));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.rank(&3), Some(1));
        assert_eq!(preorder(&tree), vec![5, 3, 1, 8]);
        assert_eq!(tree.get(&3), Some(&"x"));
        assert_eq!(tree.get(&8), Some(&"y"));
        check(&tree);
    }

    #[test]
    fn unzip_splits_path() {
        // A right-leaning path of equal ranks, then a higher-ranked key in the
        // middle has to split it in two.
        let mut tree = ZipTree::new();
        for key in [10, 20, 30, 40] {
            tree.insert_with_rank(key, (), 0);
        }
        assert_eq!(preorder(&tree), vec![10, 20, 30, 40]);
        tree.insert_with_rank(25, (), 1);
        check(&tree);
        assert_eq!(preorder(&tree), vec![25, 10, 20, 30, 40]);
        assert_eq!(tree.depth(&20), Ok(2));
        assert_eq!(tree.depth(&40), Ok(2));

        // A zig-zag search path alternates runs on both sides.
        let mut tree = ZipTree::new();
        tree.insert_with_rank(50, (), 4);
        tree.insert_with_rank(10, (), 3);
        tree.insert_with_rank(40, (), 2);
        tree.insert_with_rank(20, (), 1);
        tree.insert_with_rank(30, (), 0);
        assert_eq!(preorder(&tree), vec![50, 10, 40, 20, 30]);
        tree.insert_with_rank(25, (), 3);
        check(&tree);
        assert_eq!(preorder(&tree), vec![50, 10, 25, 20, 40, 30]);
    }

    #[test]
    fn equal_rank_tie_break() {
        // With equal ranks the smaller key stays above.
        let mut tree = ZipTree::new();
        tree.insert_with_rank(2, (), 1);
        tree.insert_with_rank(1, (), 1);
        check(&tree);
        assert_eq!(preorder(&tree), vec![1, 2]);

        let mut tree = ZipTree::new();
        tree.insert_with_rank(1, (), 1);
        tree.insert_with_rank(2, (), 1);
        check(&tree);
        assert_eq!(preorder(&tree), vec![1, 2]);
    }

    #[test]
    fn zip_merges_spines() -> Result<()> {
        let mut tree = ZipTree::new();
        tree.insert_with_rank(50, (), 5);
        tree.insert_with_rank(20, (), 3);
        tree.insert_with_rank(80, (), 4);
        tree.insert_with_rank(30, (), 2);
        tree.insert_with_rank(70, (), 1);
        tree.insert_with_rank(40, (), 0);
        assert_eq!(preorder(&tree), vec![50, 20, 30, 40, 80, 70]);

        tree.remove(&50)?;
        check(&tree);
        assert_eq!(preorder(&tree), vec![80, 20, 30, 70, 40]);
        Ok(())
    }

    #[test]
    fn shape_ignores_order() {
        let ranks = [(4, 0), (2, 1), (6, 1), (1, 3), (3, 0), (5, 2), (7, 0)];
        let mut a = ZipTree::new();
        for &(key, rank) in &ranks {
            a.insert_with_rank(key, (), rank);
        }
        let mut b = ZipTree::new();
        for &(key, rank) in ranks.iter().rev() {
            b.insert_with_rank(key, (), rank);
        }
        check(&a);
        check(&b);
        assert_eq!(preorder(&a), preorder(&b));
    }

    #[rstest]
    fn random_ops(#[values(1, 2, 3)] seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = ZipTree::with_seed(seed);
        let mut model = std::collections::BTreeMap::new();
        for _ in 0..5000 {
            let key: u16 = rng.random_range(0..500);
            if rng.random_bool(0.6) {
                let value: u32 = rng.random();
                assert_eq!(tree.insert(key, value), model.insert(key, value));
            } else {
                assert_eq!(tree.remove(&key).ok(), model.remove(&key));
            }
        }
        check(&tree);
        assert_eq!(tree.len(), model.len());
        for (key, value) in &model {
            assert_eq!(tree.get(key), Some(value));
        }
    }

    #[test]
    fn logarithmic_height() {
        let tree: ZipTree<u32, ()> = (0..10_000).map(|x| (x, ())).collect();
        check(&tree);
        let height = tree.height().unwrap_or_default();
        // Expected depth is about 1.5 * log2(n); leave plenty of slack.
        assert!(height < 80, "height {height} is far from logarithmic");
    }

    #[test]
    fn get_mut_clear() {
        let mut tree: ZipTree<_, _> = (0..50).map(|x| (x, x)).collect();
        if let Some(v) = tree.get_mut(&10) {
            *v = 100;
        }
        assert_eq!(tree.get(&10), Some(&100));
        assert!(tree.contains_key(&49));
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains_key(&49));
        check(&tree);
    }

    #[test]
    fn debug_display() {
        let tree = scenario();
        assert_eq!(
            format!("{tree:?}"),
            r#"{1: "d", 3: "b", 5: "a", 8: "c"}"#
        );
    }
}

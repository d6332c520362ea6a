//! A skiplist map whose node levels are a pure function of their keys.
//!
//! Conceptually, the skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` with level `L` is linked into the chains `0..=L`,
//! allowing searches to skip ahead on the higher chains.

use std::{borrow::Borrow, cmp::Ordering, fmt, hash::Hash, iter, mem};

use tracing::{debug, trace};

use crate::{
    arena::{Arena, Link},
    error::Error,
    level_generator::{Geometric, GeometricError},
};

/// The highest level a node may occupy in a skiplist created with
/// [`SkipList::new`].
pub const DEFAULT_MAX_LEVEL: usize = 20;

/// Probability that a node on one level is also present on the next.
const P: f64 = 0.5;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// A key-value pair together with its forward links.
///
/// A node of level `n` has `n + 1` links, one for each chain it belongs to.
#[derive(Clone, Debug)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    links: Vec<Link>,
}

impl<K, V> SkipNode<K, V> {
    fn new(key: K, value: V, level: usize) -> Self {
        SkipNode {
            key,
            value,
            links: vec![None; level + 1],
        }
    }

    /// How high the node reaches.
    fn level(&self) -> usize {
        self.links.len() - 1
    }
}

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// An ordered map built from layered linked lists.
///
/// Every key is assigned a level when first inserted, and the node is then
/// linked into every chain from 0 up to that level. By default the level is
/// derived from the key alone (see [`Geometric::keyed_level`]), so inserting
/// the same keys always produces the same shape regardless of insertion order.
/// An explicit level can be given with [`SkipList::insert_with_level`].
///
/// # Examples
///
/// ```
/// use rankmaps::SkipList;
///
/// let mut skiplist = SkipList::new();
/// skiplist.insert(1, "Hello");
/// skiplist.insert(2, "World");
/// assert_eq!(skiplist.get(&2), Some(&"World"));
/// assert_eq!(skiplist.remove(&1), Some("Hello"));
/// assert_eq!(skiplist.len(), 1);
/// ```
#[derive(Clone)]
pub struct SkipList<K, V> {
    /// Node storage. Links are indices into this arena.
    nodes: Arena<SkipNode<K, V>>,
    /// The header's forward links, one per possible level.
    head: Vec<Link>,
    /// Highest non-empty chain, or 0 when empty.
    level: usize,
    len: usize,
    level_generator: Geometric,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipList<K, V> {
    /// Create a new skiplist whose nodes reach at most
    /// [`DEFAULT_MAX_LEVEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let skiplist: SkipList<i64, String> = SkipList::new();
    /// assert_eq!(skiplist.max_level(), 20);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        match Self::with_max_level(DEFAULT_MAX_LEVEL) {
            Ok(skiplist) => skiplist,
            Err(_) => unreachable!("the default configuration is valid"),
        }
    }

    /// Create a new skiplist whose nodes reach at most `max_level`.
    ///
    /// A `max_level` of 0 degenerates into a sorted linked list.
    ///
    /// # Errors
    ///
    /// Returns [`GeometricError::MaxTooLarge`] if `max_level` is not below
    /// [`Geometric::MAX_TOTAL`], before anything is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::with_max_level(4).unwrap();
    /// skiplist.extend((0..100).map(|x| (x, x)));
    /// assert!(skiplist.level() <= 4);
    /// ```
    #[inline]
    pub fn with_max_level(max_level: usize) -> Result<Self, GeometricError> {
        let total = max_level.saturating_add(1);
        // Keyed levels reseed the generator on every draw, so the initial
        // seed never shows through.
        let level_generator = Geometric::with_seed(total, P, 0)?;
        Ok(SkipList {
            nodes: Arena::new(),
            head: vec![None; total],
            level: 0,
            len: 0,
            level_generator,
        })
    }

    /// Returns the number of entries in the skiplist.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skiplist contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the highest non-empty level, or 0 if the skiplist is empty.
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the highest level a node may be assigned.
    #[inline]
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.head.len() - 1
    }

    /// Returns the number of nodes linked into the chain at `level`.
    ///
    /// Levels above [`level`][SkipList::level] are empty. Level 0 always holds
    /// every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.insert_with_level(1, 'a', 0).unwrap();
    /// skiplist.insert_with_level(2, 'b', 2).unwrap();
    /// assert_eq!(skiplist.level_len(0), 2);
    /// assert_eq!(skiplist.level_len(2), 1);
    /// assert_eq!(skiplist.level_len(3), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn level_len(&self, level: usize) -> usize {
        if level > self.level {
            return 0;
        }
        self.chain(level).count()
    }

    /// Clears the skiplist, removing all entries.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head.fill(None);
        self.level = 0;
        self.len = 0;
    }

    /// The successor of `at` on the chain at `level`, where `None` stands for
    /// the header.
    fn next(&self, at: Link, level: usize) -> Link {
        match at {
            None => self.head[level],
            Some(index) => self.nodes[index].links[level],
        }
    }

    fn set_next(&mut self, at: Link, level: usize, to: Link) {
        let slot = match at {
            None => &mut self.head[level],
            Some(index) => &mut self.nodes[index].links[level],
        };
        *slot = to;
    }

    /// Indices of the nodes on the chain at `level`, in key order.
    fn chain(&self, level: usize) -> impl Iterator<Item = usize> + '_ {
        iter::successors(self.head.get(level).copied().flatten(), move |&index| {
            self.nodes[index].links[level]
        })
    }
}

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    /// Insert `value` under `key`, linking a new node into the levels
    /// `0..=level`.
    ///
    /// If the key is already present, its value is replaced and the old value
    /// returned; the node keeps the level it was first given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LevelTooHigh`] if `level` exceeds
    /// [`max_level`][SkipList::max_level].
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert_eq!(skiplist.insert_with_level("a", 1, 3), Ok(None));
    /// assert_eq!(skiplist.insert_with_level("a", 2, 0), Ok(Some(1)));
    /// assert_eq!(skiplist.node_level("a"), Some(3));
    /// assert!(skiplist.insert_with_level("b", 3, 21).is_err());
    /// ```
    #[inline]
    pub fn insert_with_level(&mut self, key: K, value: V, level: usize) -> Result<Option<V>, Error> {
        let max = self.max_level();
        if level > max {
            return Err(Error::LevelTooHigh { level, max });
        }
        Ok(self.insert_at(key, value, level))
    }

    /// Insert assuming `level <= max_level`.
    fn insert_at(&mut self, key: K, value: V, level: usize) -> Option<V> {
        let (candidate, path) = self.search(&key, level);
        if let Some(index) = candidate {
            let node = &mut self.nodes[index];
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
        }

        // Levels above the current one were never visited by the search, so
        // their predecessor is already the header.
        if level > self.level {
            debug!(from = self.level, to = level, "raising skiplist level");
            self.level = level;
        }

        let index = self.nodes.insert(SkipNode::new(key, value, level));
        for (l, &predecessor) in path.iter().enumerate().take(level + 1) {
            let successor = self.next(predecessor, l);
            self.nodes[index].links[l] = successor;
            self.set_next(predecessor, l, Some(index));
        }
        self.len += 1;
        trace!(level, len = self.len, "inserted skiplist node");
        None
    }

    /// Remove the entry for `key`, returning its value.
    ///
    /// Removing a key which is not present does nothing and returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.insert(1, "a");
    /// assert_eq!(skiplist.remove(&1), Some("a"));
    /// assert_eq!(skiplist.remove(&1), None);
    /// assert!(skiplist.is_empty());
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (candidate, path) = self.search(key, 0);
        let index = candidate.filter(|&index| self.key_cmp(index, key).is_eq())?;

        // The node occupies a contiguous run of levels starting at 0, so the
        // first predecessor not pointing at it marks the end of the run.
        for (l, &predecessor) in path.iter().enumerate().take(self.level + 1) {
            if self.next(predecessor, l) != Some(index) {
                break;
            }
            let successor = self.nodes[index].links[l];
            self.set_next(predecessor, l, successor);
        }

        let before = self.level;
        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            debug!(from = before, to = self.level, "lowering skiplist level");
        }

        self.len -= 1;
        trace!(len = self.len, "removed skiplist node");
        Some(self.nodes.remove(index).value)
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.insert(1, "a");
    /// assert_eq!(skiplist.get(&1), Some(&"a"));
    /// assert_eq!(skiplist.get(&2), None);
    /// ```
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

    /// Returns `true` if the skiplist contains an entry for `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the level of the node holding `key`, that is the highest chain
    /// it is linked into.
    #[inline]
    pub fn node_level<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|index| self.nodes[index].level())
    }

    fn key_cmp<Q>(&self, index: usize, key: &Q) -> Ordering
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ord::cmp(self.nodes[index].key.borrow(), key)
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.walk(key, |_, _| {})
            .filter(|&index| self.key_cmp(index, key).is_eq())
    }

    /// Walk down from the current top level, advancing along each chain while
    /// the next key is less than `key`, and report the last node visited on
    /// each level to `visit` (`None` standing for the header).
    ///
    /// Returns the first node at level 0 whose key is not less than `key`.
    fn walk<Q>(&self, key: &Q, mut visit: impl FnMut(usize, Link)) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current: Link = None;
        for level in (0..=self.level).rev() {
            while let Some(next) = self.next(current, level) {
                if self.key_cmp(next, key).is_lt() {
                    current = Some(next);
                } else {
                    break;
                }
            }
            visit(level, current);
        }
        self.next(current, 0)
    }

    /// Like [`walk`][SkipList::walk], but also returns the predecessor path.
    ///
    /// The path covers the levels `0..=max(height, level)`, so that a node of
    /// level `height` can be spliced in. Levels above the current top are
    /// never visited and keep the header as their predecessor.
    fn search<Q>(&self, key: &Q, height: usize) -> (Link, Vec<Link>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = vec![None; height.max(self.level) + 1];
        let candidate = self.walk(key, |level, predecessor| {
            if let Some(slot) = path.get_mut(level) {
                *slot = predecessor;
            }
        });
        (candidate, path)
    }

    /// Checks the integrity of the skiplist.
    ///
    /// Every chain must be strictly increasing, every node must appear on
    /// exactly the chains `0..=level`, and the recorded level and length must
    /// match the nodes present.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken invariant.
    #[doc(hidden)]
    #[inline]
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        let bottom: Vec<usize> = self.chain(0).collect();
        if bottom.len() != self.len || self.nodes.len() != self.len {
            return Err("length does not match the nodes present");
        }
        if bottom
            .windows(2)
            .any(|pair| !matches!(pair, [a, b] if self.nodes[*a].key < self.nodes[*b].key))
        {
            return Err("keys are not strictly increasing");
        }

        let top = bottom
            .iter()
            .map(|&index| self.nodes[index].level())
            .max()
            .unwrap_or(0);
        if top != self.level {
            return Err("level is not the highest node level");
        }

        for level in 1..self.head.len() {
            let expected = bottom
                .iter()
                .copied()
                .filter(|&index| self.nodes[index].level() >= level);
            if !expected.eq(self.chain(level)) {
                return Err("a chain is not the contiguous subset of the level below");
            }
        }
        Ok(())
    }
}

impl<K, V> SkipList<K, V>
where
    K: Ord + Hash,
{
    /// Insert `value` under `key`.
    ///
    /// A new key is given the level [`Geometric::keyed_level`] derives from
    /// it. If the key is already present, its value is replaced and the old
    /// value returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// assert_eq!(skiplist.insert(1, "Hello"), None);
    /// assert_eq!(skiplist.insert(1, "World"), Some("Hello"));
    /// assert_eq!(skiplist.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let level = self.level_generator.keyed_level(&key);
        self.insert_at(key, value, level)
    }
}

#[cfg(test)]
impl<K, V> SkipList<K, V>
where
    K: fmt::Debug,
{
    /// Renders every non-empty chain, top level first.
    fn debug_structure(&self) -> String {
        (0..=self.level)
            .rev()
            .map(|level| {
                self.chain(level).fold(format!("{level}: head"), |row, index| {
                    format!("{row} -> {:?}", self.nodes[index].key)
                })
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V> Default for SkipList<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for SkipList<K, V>
where
    K: Ord + Hash,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SkipList<K, V>
where
    K: Ord + Hash,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut skiplist = Self::new();
        skiplist.extend(iter);
        skiplist
    }
}

impl<K, V> fmt::Debug for SkipList<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.chain(0).map(|index| {
                let node = &self.nodes[index];
                (&node.key, &node.value)
            }))
            .finish()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

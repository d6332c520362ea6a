//! Rebuilding a [`SkipList`] from a [`ZipTree`].
//!
//! A zip-tree rank and a skiplist level are drawn from the same geometric
//! distribution, and both measure how "tall" a key is. Reusing each rank as
//! the level of the corresponding skiplist node therefore transplants the
//! random choices of the tree into the skiplist, key for key.

use tracing::debug;

use crate::{error::Error, skiplist::SkipList, ziptree::ZipTree};

impl<K, V> SkipList<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    /// Insert every entry of `tree` with a level equal to its rank in the
    /// tree.
    ///
    /// Entries are visited in key order. Keys already present in the skiplist
    /// have their value replaced but keep their existing level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LevelTooHigh`] if a rank in the tree exceeds
    /// [`max_level`][SkipList::max_level]. This is checked before anything is
    /// inserted, so on error the skiplist is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rankmaps::{SkipList, ZipTree};
    ///
    /// let mut tree = ZipTree::new();
    /// tree.insert_with_rank(5, "a", 2);
    /// tree.insert_with_rank(3, "b", 1);
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend_from_zip_tree(&tree).unwrap();
    /// assert_eq!(skiplist.node_level(&5), Some(2));
    /// assert_eq!(skiplist.node_level(&3), Some(1));
    /// ```
    #[inline]
    pub fn extend_from_zip_tree(&mut self, tree: &ZipTree<K, V>) -> Result<(), Error> {
        let max = self.max_level();
        if let Some(level) = tree.max_rank().filter(|&rank| rank > max) {
            return Err(Error::LevelTooHigh { level, max });
        }

        debug!(len = tree.len(), "building skiplist from zip tree");
        let mut result = Ok(());
        tree.walk_in_order(|key, value, rank| {
            if result.is_ok() {
                result = self
                    .insert_with_level(key.clone(), value.clone(), rank)
                    .map(|_| ());
            }
        });
        result
    }
}

impl<K, V> TryFrom<&ZipTree<K, V>> for SkipList<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    type Error = Error;

    /// Build a skiplist with the default maximum level from `tree`.
    #[inline]
    fn try_from(tree: &ZipTree<K, V>) -> Result<Self, Error> {
        let mut skiplist = SkipList::new();
        skiplist.extend_from_zip_tree(tree)?;
        Ok(skiplist)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{DEFAULT_MAX_LEVEL, SkipList, ZipTree, error::Error};

    #[test]
    fn scenario() -> Result<()> {
        let mut tree = ZipTree::new();
        tree.insert_with_rank(5, "a", 2);
        tree.insert_with_rank(3, "b", 1);
        tree.insert_with_rank(8, "c", 1);
        tree.insert_with_rank(1, "d", 0);

        let sl = SkipList::try_from(&tree)?;
        sl.check_invariants().map_err(anyhow::Error::msg)?;
        assert_eq!(sl.len(), 4);
        assert_eq!(sl.level(), 2);
        assert_eq!(sl.level_len(0), 4);
        assert_eq!(sl.level_len(1), 3);
        assert_eq!(sl.level_len(2), 1);
        for (key, value) in [(1, "d"), (3, "b"), (5, "a"), (8, "c")] {
            assert_eq!(sl.get(&key), Some(&value));
            assert_eq!(sl.node_level(&key), tree.rank(&key));
        }
        Ok(())
    }

    #[rstest]
    fn fidelity(#[values(0, 1, 2, 3)] seed: u64) -> Result<()> {
        let mut tree = ZipTree::with_seed(seed);
        tree.extend((0..2000_u32).map(|x| (x * 7 % 2003, x)));
        // Sampled ranks above the default cap are possible, if vanishingly
        // rare, so use a skiplist tall enough for any of them.
        let mut sl = SkipList::with_max_level(tree.max_rank().unwrap_or(0))?;
        sl.extend_from_zip_tree(&tree)?;
        sl.check_invariants().map_err(anyhow::Error::msg)?;

        assert_eq!(sl.level_len(0), tree.len());
        assert_eq!(sl.level(), tree.max_rank().unwrap_or(0));
        for key in 0..2003 {
            assert_eq!(sl.node_level(&key), tree.rank(&key));
            assert_eq!(sl.get(&key), tree.get(&key));
        }
        Ok(())
    }

    #[test]
    fn empty() -> Result<()> {
        let tree: ZipTree<u8, u8> = ZipTree::new();
        let sl = SkipList::try_from(&tree)?;
        assert!(sl.is_empty());
        assert_eq!(sl.level(), 0);
        Ok(())
    }

    #[test]
    fn rank_too_high() {
        let mut tree = ZipTree::new();
        tree.insert_with_rank(1, (), 0);
        tree.insert_with_rank(2, (), DEFAULT_MAX_LEVEL + 1);

        let mut sl = SkipList::new();
        sl.insert_with_level(0, (), 0).ok();
        assert_eq!(
            sl.extend_from_zip_tree(&tree),
            Err(Error::LevelTooHigh {
                level: DEFAULT_MAX_LEVEL + 1,
                max: DEFAULT_MAX_LEVEL,
            })
        );
        // Nothing was inserted.
        assert_eq!(sl.len(), 1);
        assert!(!sl.contains_key(&1));
    }

    #[test]
    fn existing_keys_keep_level() -> Result<()> {
        let mut tree = ZipTree::new();
        tree.insert_with_rank(1, "tree", 3);
        tree.insert_with_rank(2, "tree", 0);

        let mut sl = SkipList::new();
        sl.insert_with_level(1, "list", 1)?;
        sl.extend_from_zip_tree(&tree)?;
        assert_eq!(sl.get(&1), Some(&"tree"));
        assert_eq!(sl.node_level(&1), Some(1));
        assert_eq!(sl.node_level(&2), Some(0));
        Ok(())
    }
}

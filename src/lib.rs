//! Two probabilistic ordered maps which stay balanced, in expectation, using
//! nothing more than one random number per key.
//!
//! - A [`SkipList`] stores its entries on a stack of sorted linked lists. Each
//!   key is given a random *level* and linked into every list up to that
//!   level, so that searches can skip ahead on the sparser upper lists:
//!
//!   ```text
//!   <head> ----------> [2] ---------------------------------> [9] ->
//!   <head> ----------> [2] ---------------------------> [7] -> [9] ->
//!   <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [7] --> [9] ->
//!   ```
//!
//!   Levels are derived from the keys themselves, so the same keys always
//!   produce the same list.
//!
//! - A [`ZipTree`] is a binary search tree in which each key is given a random
//!   *rank*, with higher ranks closer to the root. New keys are inserted by
//!   *unzipping* the path they land on, and removed keys are replaced by
//!   *zipping* their two subtrees together.
//!
//! Levels and ranks follow the same geometric distribution, where a height of
//! $k$ is drawn with probability $2^{-(k+1)}$. A skiplist can therefore be
//! rebuilt from a zip tree by reusing every rank as a level; see
//! [`SkipList::extend_from_zip_tree`].
//!
//! Keys must be totally ordered, and the ordering **must** be well-behaved:
//! it must be consistent, anti-symmetric and transitive. Failure to satisfy
//! these properties results in entries that cannot be found again, though
//! never in memory unsafety.
//!
//! ```
//! use rankmaps::{SkipList, ZipTree};
//!
//! let mut tree = ZipTree::new();
//! tree.extend((0..100).map(|x| (x, x * x)));
//! assert_eq!(tree.get(&9), Some(&81));
//!
//! let mut skiplist = SkipList::with_max_level(tree.max_rank().unwrap()).unwrap();
//! skiplist.extend_from_zip_tree(&tree).unwrap();
//! for key in 0..100 {
//!     assert_eq!(skiplist.node_level(&key), tree.rank(&key));
//! }
//! ```

mod arena;
mod convert;
mod error;
pub mod level_generator;
mod skiplist;
mod ziptree;

pub use error::Error;
pub use level_generator::{Geometric, GeometricError, LevelGenerator};
pub use skiplist::{DEFAULT_MAX_LEVEL, SkipList};
pub use ziptree::ZipTree;

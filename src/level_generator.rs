//! Both maps in this crate assign each key a random height: the skiplist calls
//! it a *level* (the highest chain the key is linked into), the zip tree calls
//! it a *rank* (its preference for sitting close to the root). In both cases
//! the value is drawn from a geometric distribution, whereby the chance that a
//! key reaches height $n$ is $p$ times the chance of reaching height $n-1$
//! (with $0 < p < 1$).
//!
//! The skiplist additionally needs its levels to be a pure function of the key
//! so that the same keys always produce the same shape; see
//! [`Geometric::keyed_level`].

pub mod geometric;

pub use geometric::{Geometric, GeometricError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node, the node is given a height as determined
/// by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This function should _never_ return a level greater or equal to
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}

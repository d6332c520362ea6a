//! Geometric level generator.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must not exceed [`Geometric::MAX_TOTAL`].
    #[error("max must be at most 256.")]
    MaxTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum number of levels allowed.
///
/// With `$p = 1/2$` a level `$k$` is produced with probability
/// `$2^{-(k+1)}$`, except for the top level which absorbs the tail.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// The largest number of levels a generator may have.
    ///
    /// With `$p = 1/2$`, reaching even the top of this range has probability
    /// `$2^{-255}$`, while skiplists allocate a header slot for every level.
    pub const MAX_TOTAL: usize = 256;

    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// The generator is seeded from the thread-local random number generator.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be between 1
    /// and [`MAX_TOTAL`][Geometric::MAX_TOTAL].
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a new geometric level generator whose stream of levels is
    /// entirely determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if total > Self::MAX_TOTAL {
            return Err(GeometricError::MaxTooLarge);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }

    /// Generate a level which depends only on `key`.
    ///
    /// The random number generator is reseeded from a hash of the key before
    /// sampling, so the same key always yields the same level from any
    /// generator with the same `total` and `p`. The reseed is not undone:
    /// subsequent calls to [`level`][LevelGenerator::level] continue the
    /// stream started from the key.
    ///
    /// The hash is computed with [`DefaultHasher::new`], whose keys are
    /// fixed, and sampled with [`SmallRng`]. Levels are therefore reproducible
    /// for a given build on a given target only: neither the hasher nor the
    /// generator promises the same output across Rust or `rand` releases, and
    /// `SmallRng` picks a different algorithm on 32-bit and 64-bit platforms.
    /// Do not persist or compare levels across builds or targets.
    #[inline]
    pub fn keyed_level<K>(&mut self, key: &K) -> usize
    where
        K: Hash + ?Sized,
    {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.rng = SmallRng::seed_from_u64(hasher.finish());
        self.level()
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// A biased coin is flipped until it first comes up tails, and the number
    /// of heads is the level. Flipping stops early once the top level
    /// `$\text{total} - 1$` is reached.
    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}

//! Errors raised by the maps in this crate.

use thiserror::Error;

/// Errors that can occur when operating on a [`SkipList`][crate::SkipList] or
/// a [`ZipTree`][crate::ZipTree].
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum Error {
    /// The key is not present in the map.
    #[error("key not found.")]
    NotFound,
    /// A node was requested at a level the skiplist does not have.
    #[error("level {level} exceeds the maximum level {max}.")]
    LevelTooHigh {
        /// The requested level.
        level: usize,
        /// The highest level the skiplist supports.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Error;

    #[test]
    fn display() {
        assert_eq!(Error::NotFound.to_string(), "key not found.");
        assert_eq!(
            Error::LevelTooHigh { level: 21, max: 20 }.to_string(),
            "level 21 exceeds the maximum level 20."
        );
    }
}

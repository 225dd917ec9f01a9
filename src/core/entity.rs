//! Tile identification.
//!
//! Tiles move around the board as they are swapped and as columns collapse.
//! Rather than aliasing references, every tile lives in the board's arena
//! under a `TileId` handle; its `row`/`col` are rewritten in place when it
//! moves, so "the same tile" survives any number of collapses.
//!
//! ## ID Layout
//!
//! IDs are allocated monotonically by the owning board starting at 0 and
//! are never reused, even after a tile is cleared.
//!
//! ```
//! use letter_cascade::core::TileId;
//!
//! let first = TileId::FIRST;
//! assert_eq!(first.next(), TileId(1));
//! ```

use serde::{Deserialize, Serialize};

/// Stable handle to a tile in a board's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// First id handed out by a fresh board.
    pub const FIRST: TileId = TileId(0);

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_monotonic() {
        let mut id = TileId::FIRST;
        for expected in 1..10 {
            id = id.next();
            assert_eq!(id.raw(), expected);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", TileId(42)), "Tile(42)");
    }

    #[test]
    fn test_serialization() {
        let id = TileId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

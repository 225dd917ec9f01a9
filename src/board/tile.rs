//! Tiles, letters and power-ups.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Orientation, TileId};

/// A tile letter from the configured alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Letter(pub char);

impl Letter {
    /// The default five-letter alphabet.
    pub const DEFAULT_ALPHABET: [Letter; 5] = [Letter('A'), Letter('B'), Letter('C'), Letter('D'), Letter('E')];

    #[must_use]
    pub const fn new(c: char) -> Self {
        Self(c)
    }
}

impl From<char> for Letter {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of special ability a tile carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Wipes its row or column when swapped.
    LineClear,
    /// Spawned by 5-runs. Carries no swap effect yet.
    ColorClear,
}

/// A power-up attached to a tile.
///
/// `orientation` is set for line clears and `None` for color clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub orientation: Option<Orientation>,
}

impl PowerUp {
    /// A line clear along the given orientation.
    #[must_use]
    pub const fn line_clear(orientation: Orientation) -> Self {
        Self {
            kind: PowerUpKind::LineClear,
            orientation: Some(orientation),
        }
    }

    /// An orientation-less color clear.
    #[must_use]
    pub const fn color_clear() -> Self {
        Self {
            kind: PowerUpKind::ColorClear,
            orientation: None,
        }
    }

    #[must_use]
    pub fn is_line_clear(&self) -> bool {
        self.kind == PowerUpKind::LineClear
    }
}

/// A lettered tile.
///
/// `row`/`col` always mirror the tile's slot on its board; the board
/// rewrites them in place on swap and collapse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub row: usize,
    pub col: usize,
    pub letter: Letter,
    pub power_up: Option<PowerUp>,
}

impl Tile {
    /// Create a plain tile at a position.
    pub fn new(id: TileId, cell: Cell, letter: Letter) -> Self {
        Self {
            id,
            row: cell.row,
            col: cell.col,
            letter,
            power_up: None,
        }
    }

    /// Current position of the tile.
    #[must_use]
    pub fn cell(&self) -> Cell {
        Cell::new(self.row, self.col)
    }

    #[must_use]
    pub fn is_power_up(&self) -> bool {
        self.power_up.is_some()
    }

    /// The line-clear orientation if this tile carries one.
    #[must_use]
    pub fn line_clear(&self) -> Option<Orientation> {
        self.power_up
            .filter(PowerUp::is_line_clear)
            .and_then(|p| p.orientation)
    }
}

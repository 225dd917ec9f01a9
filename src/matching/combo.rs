//! Line-clear swap activation.
//!
//! When a swap moves at least one line-clear tile, the swap does not go
//! through ordinary matching. Each line-clear tile among the swapped pair
//! wipes its whole row or column (by its own orientation), regardless of
//! letter; multiple wipes are unioned. Swapping two power-ups together
//! earns a bonus on top of the cleared points.
//!
//! Activation only clears. Collapse/refill and the follow-up resolution loop
//! are driven by the caller.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Cell, Orientation, TileId};
use crate::resolve::{combo_bonus, score_matches, LetterValues};

/// What a line-clear activation removed and scored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboOutcome {
    /// Cells of the line-clear tiles that fired.
    pub triggers: Vec<Cell>,
    /// Cleared cells, row-major.
    pub cleared: Vec<Cell>,
    /// Handles of the tiles removed.
    pub removed: Vec<TileId>,
    /// Letter-value points of the cleared tiles.
    pub points: u64,
    /// Extra points for a power-up-to-power-up swap.
    pub bonus: u64,
    /// Both swapped tiles carried a power-up.
    pub power_up_pair: bool,
}

impl ComboOutcome {
    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.points.saturating_add(self.bonus)
    }
}

/// Every occupied cell on the line through `origin`.
///
/// ```
/// use letter_cascade::board::Board;
/// use letter_cascade::core::{Cell, Orientation};
/// use letter_cascade::matching::build_line_clear_set;
///
/// let board = Board::from_rows(&["AB.", "CDE", ".FG"]);
/// assert_eq!(build_line_clear_set(&board, Cell::new(1, 1), Orientation::Horizontal).len(), 3);
/// assert_eq!(build_line_clear_set(&board, Cell::new(1, 1), Orientation::Vertical).len(), 3);
/// ```
#[must_use]
pub fn build_line_clear_set(board: &Board, origin: Cell, orientation: Orientation) -> FxHashSet<Cell> {
    let line: Vec<Cell> = match orientation {
        Orientation::Horizontal => (0..board.cols()).map(|col| Cell::new(origin.row, col)).collect(),
        Orientation::Vertical => (0..board.rows()).map(|row| Cell::new(row, origin.col)).collect(),
    };
    line.into_iter().filter(|&cell| board.tile_at(cell).is_some()).collect()
}

/// True when a swap between `a` and `b` (already performed) moved a line clear.
#[must_use]
pub fn is_combo_swap(board: &Board, a: Cell, b: Cell) -> bool {
    [a, b]
        .iter()
        .any(|&cell| board.tile_at(cell).and_then(|t| t.line_clear()).is_some())
}

/// Fire the line clears among the swapped pair and remove their lines.
///
/// `a` and `b` are the pair's positions after the swap. Returns `None` when
/// nothing was cleared, in which case the caller falls through to normal
/// resolution.
pub fn activate_line_clear_combo(
    board: &mut Board,
    a: Cell,
    b: Cell,
    letter_values: &LetterValues,
    bonus_multiplier: f64,
) -> Option<ComboOutcome> {
    let power_up_pair = [a, b]
        .iter()
        .all(|&cell| board.tile_at(cell).is_some_and(|t| t.is_power_up()));

    let mut triggers = Vec::new();
    let mut clear_set = FxHashSet::default();
    for cell in [a, b] {
        if let Some(orientation) = board.tile_at(cell).and_then(|t| t.line_clear()) {
            triggers.push(cell);
            clear_set.extend(build_line_clear_set(board, cell, orientation));
        }
    }

    if clear_set.is_empty() {
        return None;
    }

    let mut cleared: Vec<Cell> = clear_set.into_iter().collect();
    cleared.sort_unstable();
    let points = score_matches(board, &cleared, letter_values);
    let bonus = if power_up_pair { combo_bonus(points, bonus_multiplier) } else { 0 };
    let removed = board.clear_cells(&cleared).into_iter().map(|tile| tile.id).collect();

    Some(ComboOutcome {
        triggers,
        cleared,
        removed,
        points,
        bonus,
        power_up_pair,
    })
}

//! Power-up spawning for long runs.
//!
//! A 4-run spawns a line clear along its own orientation, a 5-run spawns a
//! color clear. One cell per run hosts the power-up: the tile there survives
//! the clear, transformed, while the rest of the run is removed.
//!
//! ## Cell Selection
//!
//! 1. The swap destination, on the player's own pass, when it lies in the run
//! 2. Otherwise the center (`length / 2`), then alternating outward
//!    `+1, -1, +2, -2, ...`
//!
//! Cells already claimed by another run in the same pass are skipped, so an
//! L or T intersection never hosts two power-ups. All 5-runs claim cells
//! before any 4-run.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::detector::MatchRun;
use crate::board::{Board, PowerUp};
use crate::core::{Cell, Orientation};

/// A power-up chosen for a run, not yet applied to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpSpawn {
    pub cell: Cell,
    pub power_up: PowerUp,
    /// Index of the originating run in the detection pass.
    pub run_index: usize,
}

/// Power-up earned by a run of `length`, if any.
#[must_use]
pub fn power_up_for_length(length: usize, orientation: Orientation) -> Option<PowerUp> {
    match length {
        4 => Some(PowerUp::line_clear(orientation)),
        5 => Some(PowerUp::color_clear()),
        _ => None,
    }
}

/// Pick the cell of `cells` that hosts the run's power-up.
///
/// `swap_destination` should only be supplied for the player's direct swap
/// (cascade index 0). Returns `None` when every cell is already reserved.
///
/// ```
/// use letter_cascade::core::Cell;
/// use letter_cascade::matching::select_match_power_up_cell;
/// use rustc_hash::FxHashSet;
///
/// let cells: Vec<Cell> = (0..4).map(|c| Cell::new(0, c)).collect();
/// let picked = select_match_power_up_cell(&cells, None, &FxHashSet::default());
/// assert_eq!(picked, Some(Cell::new(0, 2)));
/// ```
#[must_use]
pub fn select_match_power_up_cell(
    cells: &[Cell],
    swap_destination: Option<Cell>,
    reserved: &FxHashSet<Cell>,
) -> Option<Cell> {
    if let Some(dest) = swap_destination {
        if cells.contains(&dest) && !reserved.contains(&dest) {
            return Some(dest);
        }
    }

    let len = cells.len();
    let center = len / 2;
    let candidates = std::iter::once(center).chain((1..=len).flat_map(|offset| {
        let right = center.checked_add(offset);
        let left = center.checked_sub(offset);
        [right, left].into_iter().flatten()
    }));

    candidates
        .filter(|&index| index < len)
        .map(|index| cells[index])
        .find(|cell| !reserved.contains(cell))
}

/// Choose spawn cells for every qualifying run of a detection pass.
pub fn plan_power_ups(runs: &[MatchRun], swap_destination: Option<Cell>, cascade_index: u32) -> Vec<PowerUpSpawn> {
    let destination = swap_destination.filter(|_| cascade_index == 0);
    let mut reserved = FxHashSet::default();
    let mut spawns = Vec::new();

    let by_priority = [5, 4].into_iter().flat_map(|length| {
        runs.iter()
            .enumerate()
            .filter(move |(_, run)| run.length == length)
    });

    for (run_index, run) in by_priority {
        let Some(power_up) = power_up_for_length(run.length, run.orientation) else {
            continue;
        };
        if let Some(cell) = select_match_power_up_cell(&run.cells, destination, &reserved) {
            reserved.insert(cell);
            spawns.push(PowerUpSpawn { cell, power_up, run_index });
        }
    }

    spawns
}

/// Transform the spawn tiles and keep them out of the clear set.
///
/// Returns the number of power-ups placed.
pub fn apply_power_ups(board: &mut Board, spawns: &[PowerUpSpawn], cleared: &mut FxHashSet<Cell>) -> usize {
    let mut placed = 0;
    for spawn in spawns {
        cleared.remove(&spawn.cell);
        if board.set_power_up(spawn.cell, spawn.power_up) {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PowerUpKind;
    use crate::matching::find_matches;

    fn row_cells(row: usize, cols: std::ops::Range<usize>) -> Vec<Cell> {
        cols.map(|col| Cell::new(row, col)).collect()
    }

    #[test]
    fn test_policy_by_length() {
        assert_eq!(power_up_for_length(3, Orientation::Horizontal), None);
        assert_eq!(
            power_up_for_length(4, Orientation::Vertical),
            Some(PowerUp::line_clear(Orientation::Vertical))
        );
        assert_eq!(power_up_for_length(5, Orientation::Horizontal), Some(PowerUp::color_clear()));
        assert_eq!(power_up_for_length(6, Orientation::Horizontal), None);
    }

    #[test]
    fn test_prefers_swap_destination() {
        let cells = row_cells(1, 1..5);
        let picked = select_match_power_up_cell(&cells, Some(Cell::new(1, 3)), &FxHashSet::default());
        assert_eq!(picked, Some(Cell::new(1, 3)));
    }

    #[test]
    fn test_destination_outside_run_is_ignored() {
        let cells = row_cells(0, 0..4);
        let picked = select_match_power_up_cell(&cells, Some(Cell::new(3, 3)), &FxHashSet::default());
        assert_eq!(picked, Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_even_vertical_picks_lower_center() {
        let cells: Vec<Cell> = (0..4).map(|row| Cell::new(row, 5)).collect();
        let picked = select_match_power_up_cell(&cells, None, &FxHashSet::default());
        assert_eq!(picked, Some(Cell::new(2, 5)));
    }

    #[test]
    fn test_search_alternates_right_then_left() {
        let cells = row_cells(0, 0..5);
        let mut reserved: FxHashSet<Cell> = [Cell::new(0, 2)].into_iter().collect();
        assert_eq!(select_match_power_up_cell(&cells, None, &reserved), Some(Cell::new(0, 3)));

        reserved.insert(Cell::new(0, 3));
        assert_eq!(select_match_power_up_cell(&cells, None, &reserved), Some(Cell::new(0, 1)));

        reserved.insert(Cell::new(0, 1));
        assert_eq!(select_match_power_up_cell(&cells, None, &reserved), Some(Cell::new(0, 4)));

        reserved.insert(Cell::new(0, 4));
        assert_eq!(select_match_power_up_cell(&cells, None, &reserved), Some(Cell::new(0, 0)));

        reserved.insert(Cell::new(0, 0));
        assert_eq!(select_match_power_up_cell(&cells, None, &reserved), None);
    }

    #[test]
    fn test_reserved_destination_falls_back_to_center() {
        let cells = row_cells(0, 0..4);
        let reserved: FxHashSet<Cell> = [Cell::new(0, 0)].into_iter().collect();
        let picked = select_match_power_up_cell(&cells, Some(Cell::new(0, 0)), &reserved);
        assert_eq!(picked, Some(Cell::new(0, 2)));
    }

    #[test]
    fn test_swap_destination_ignored_on_cascade() {
        let board = Board::from_rows(&["AAAA", "BCDE"]);
        let scan = find_matches(&board);

        let first = plan_power_ups(&scan.runs, Some(Cell::new(0, 0)), 0);
        assert_eq!(first[0].cell, Cell::new(0, 0));

        let cascade = plan_power_ups(&scan.runs, Some(Cell::new(0, 0)), 1);
        assert_eq!(cascade[0].cell, Cell::new(0, 2));
    }

    #[test]
    fn test_five_run_claims_before_four_run() {
        // Row 2 is a 5-run, column 2 a 4-run; both prefer cell (2, 2).
        let board = Board::from_rows(&["BCADE", "CDAEB", "AAAAA", "DEABC", "EBCDB"]);
        let scan = find_matches(&board);
        let spawns = plan_power_ups(&scan.runs, None, 1);

        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].power_up.kind, PowerUpKind::ColorClear);
        assert_eq!(spawns[0].cell, Cell::new(2, 2));
        assert_eq!(spawns[1].power_up, PowerUp::line_clear(Orientation::Vertical));
        assert_eq!(spawns[1].cell, Cell::new(3, 2));
    }

    #[test]
    fn test_apply_excludes_spawn_cell_from_clear() {
        let mut board = Board::from_rows(&["AAAA", "BCDE"]);
        let mut scan = find_matches(&board);
        let spawns = plan_power_ups(&scan.runs, None, 0);

        let placed = apply_power_ups(&mut board, &spawns, &mut scan.cleared);

        assert_eq!(placed, 1);
        assert_eq!(scan.cleared.len(), 3);
        assert!(!scan.cleared.contains(&Cell::new(0, 2)));
        assert_eq!(
            board.tile_at(Cell::new(0, 2)).and_then(|t| t.line_clear()),
            Some(Orientation::Horizontal)
        );
    }

    #[test]
    fn test_three_runs_spawn_nothing() {
        let board = Board::from_rows(&["AAA"]);
        let scan = find_matches(&board);
        assert!(plan_power_ups(&scan.runs, None, 0).is_empty());
    }
}

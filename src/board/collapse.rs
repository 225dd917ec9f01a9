//! Column collapse and refill.
//!
//! Collapse is split in two so the presentation layer can animate falls
//! before new tiles appear:
//!
//! 1. [`collapse_existing_tiles`] drops survivors to the lowest playable
//!    rows of their column, skipping voids, and reports each move.
//! 2. [`refill_empty_slots`] creates a tile with a random letter in every
//!    slot the collapse left open.
//!
//! [`collapse_columns`] runs both. Refills carry no no-match guarantee; the
//! next detection pass picks up any run they form.

use serde::{Deserialize, Serialize};

use super::grid::Board;
use super::tile::Letter;
use crate::core::{Cell, RandomSource, TileId};

/// A surviving tile that fell during a collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub tile: TileId,
    pub from: Cell,
    pub to: Cell,
}

/// A tile created to fill an empty slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    pub tile: TileId,
    pub cell: Cell,
    pub letter: Letter,
}

/// What a collapse (and optional refill) did to the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseReport {
    /// Survivors whose row changed, per column bottom to top.
    pub moves: Vec<TileMove>,
    /// Playable cells left empty by the collapse, per column bottom to top.
    pub empty_slots: Vec<Cell>,
    /// Tiles created by the refill, in `empty_slots` order.
    pub spawned: Vec<TileSpawn>,
}

impl CollapseReport {
    /// True when the collapse neither moved nor created a tile.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.moves.is_empty() && self.spawned.is_empty()
    }
}

/// Compact every column downward, preserving the relative order of tiles.
pub fn collapse_existing_tiles(board: &mut Board) -> CollapseReport {
    let mut report = CollapseReport::default();

    for col in 0..board.cols() {
        let playable_rows: Vec<usize> = (0..board.rows())
            .rev()
            .filter(|&row| board.mask().is_playable(Cell::new(row, col)))
            .collect();
        let survivors: Vec<TileId> = playable_rows
            .iter()
            .filter_map(|&row| board.tile_id_at(Cell::new(row, col)))
            .collect();

        for (&target_row, &id) in playable_rows.iter().zip(&survivors) {
            let to = Cell::new(target_row, col);
            let Some(from) = board.tile(id).map(|t| t.cell()) else {
                continue;
            };
            if from != to {
                // Bottom-up order guarantees the target is already vacated.
                board.relocate(id, to);
                report.moves.push(TileMove { tile: id, from, to });
            }
        }

        report
            .empty_slots
            .extend(playable_rows[survivors.len()..].iter().map(|&row| Cell::new(row, col)));
    }

    report
}

/// Create a tile with a random letter in each of `slots`.
pub fn refill_empty_slots(
    board: &mut Board,
    slots: &[Cell],
    alphabet: &[Letter],
    rng: &mut impl RandomSource,
) -> Vec<TileSpawn> {
    if alphabet.is_empty() {
        return Vec::new();
    }
    slots
        .iter()
        .filter_map(|&cell| {
            let letter = alphabet[rng.pick_index(alphabet.len())];
            board
                .spawn_tile(cell, letter)
                .map(|tile| TileSpawn { tile, cell, letter })
        })
        .collect()
}

/// Collapse every column, then refill the emptied slots.
pub fn collapse_columns(board: &mut Board, alphabet: &[Letter], rng: &mut impl RandomSource) -> CollapseReport {
    let mut report = collapse_existing_tiles(board);
    report.spawned = refill_empty_slots(board, &report.empty_slots, alphabet, rng);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedRng;

    #[test]
    fn test_collapse_respects_voids() {
        let mut board = Board::from_rows(&["A", "#", "B", "."]);
        let mut rng = ScriptedRng::constant(0.0);
        collapse_columns(&mut board, &[Letter('C')], &mut rng);

        assert_eq!(board.to_rows(), vec!["C", "#", "A", "B"]);
    }

    #[test]
    fn test_collapse_existing_tiles_tracks_moves_and_slots() {
        let mut board = Board::from_rows(&["A", ".", "B", "."]);
        let a = board.tile_id_at(Cell::new(0, 0)).unwrap();
        let b = board.tile_id_at(Cell::new(2, 0)).unwrap();

        let report = collapse_existing_tiles(&mut board);

        assert_eq!(board.to_rows(), vec![".", ".", "A", "B"]);
        assert_eq!(report.moves, vec![
            TileMove { tile: b, from: Cell::new(2, 0), to: Cell::new(3, 0) },
            TileMove { tile: a, from: Cell::new(0, 0), to: Cell::new(2, 0) },
        ]);
        assert_eq!(report.empty_slots, vec![Cell::new(1, 0), Cell::new(0, 0)]);
        assert!(report.spawned.is_empty());
    }

    #[test]
    fn test_tiles_keep_identity_across_collapse() {
        let mut board = Board::from_rows(&["A", "B", "."]);
        let a = board.tile_id_at(Cell::new(0, 0)).unwrap();
        collapse_existing_tiles(&mut board);

        assert_eq!(board.tile_id_at(Cell::new(1, 0)), Some(a));
        assert_eq!(board.tile(a).unwrap().row, 1);
    }

    #[test]
    fn test_settled_column_produces_no_moves() {
        let mut board = Board::from_rows(&[".", "A", "B"]);
        let report = collapse_existing_tiles(&mut board);
        assert!(report.moves.is_empty());
        assert_eq!(report.empty_slots, vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_survivors_fall_across_void_gap() {
        let mut board = Board::from_rows(&["AB", "##", ".C"]);
        let report = collapse_existing_tiles(&mut board);

        assert_eq!(board.to_rows(), vec![".B", "##", "AC"]);
        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].from, Cell::new(0, 0));
        assert_eq!(report.moves[0].to, Cell::new(2, 0));
    }

    #[test]
    fn test_refill_uses_rng_per_slot() {
        let mut board = Board::from_rows(&["..", "AB"]);
        let mut rng = ScriptedRng::new(vec![0.0, 0.9]);
        let report = collapse_columns(&mut board, &[Letter('X'), Letter('Y')], &mut rng);

        assert_eq!(board.to_rows(), vec!["XY", "AB"]);
        assert_eq!(report.spawned.len(), 2);
        assert_eq!(report.spawned[0].cell, Cell::new(0, 0));
        assert_eq!(report.spawned[1].letter, Letter('Y'));
        assert!(!report.is_noop());
    }
}

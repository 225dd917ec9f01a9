//! Board construction and collapse integration tests.
//!
//! These tests cover mask ingestion from untrusted JSON, the no-match fill
//! and column collapse across void cells.

use letter_cascade::board::{
    collapse_columns, collapse_existing_tiles, create_mask, normalize_mask, refill_empty_slots, Board,
    BoardDefinition, Letter, DEFAULT_GRID_SIZE,
};
use letter_cascade::core::{Cell, GameRng, ScriptedRng};
use letter_cascade::matching::find_matches;
use serde_json::json;

// =============================================================================
// Mask ingestion
// =============================================================================

/// A board definition with a valid mask keeps its voids.
#[test]
fn test_definition_with_mask() {
    let def = BoardDefinition::from_json(r#"{"rows": 3, "cols": 4, "mask": [[1,1,1,1],[1,0,0,1],[1,1,1,1]]}"#);

    assert_eq!(def.rows, 3);
    assert_eq!(def.cols, 4);
    assert!(def.mask.is_void(Cell::new(1, 1)));
    assert!(def.mask.is_void(Cell::new(1, 2)));
    assert_eq!(def.mask.playable_count(), 10);
}

/// A mask with a short row is replaced wholesale, never partially repaired.
#[test]
fn test_definition_with_ragged_mask() {
    let def = BoardDefinition::from_json(r#"{"rows": 2, "cols": 2, "mask": [[0, 0], [0]]}"#);
    assert_eq!(def.mask, create_mask(2, 2, 1));
}

/// Missing dimensions and unparsable text both fall back to the default square.
#[test]
fn test_definition_fallbacks() {
    let expected = BoardDefinition::square(DEFAULT_GRID_SIZE);
    assert_eq!(BoardDefinition::from_json(r#"{"rows": 4}"#), expected);
    assert_eq!(BoardDefinition::from_json(r#"{"rows": -1, "cols": 3}"#), expected);
    assert_eq!(BoardDefinition::from_json("{"), expected);
}

/// Non-numeric mask entries on a correctly shaped mask become void.
#[test]
fn test_non_numeric_values_are_void() {
    let mask = normalize_mask(&json!([["a", 1], [{}, [1]]]), 2, 2);
    assert_eq!(mask.to_rows(), vec![vec![0, 1], vec![0, 0]]);
}

// =============================================================================
// Filling
// =============================================================================

/// The no-match fill never writes void cells and leaves no runs.
#[test]
fn test_fill_shaped_board() {
    let def = BoardDefinition::from_json(r#"{"rows": 5, "cols": 5, "mask": [[1,1,0,1,1],[1,1,0,1,1],[1,1,1,1,1],[1,1,0,1,1],[1,1,0,1,1]]}"#);
    let mut rng = GameRng::new(2024);
    let board = Board::fill_grid_no_matches(&def.mask, &Letter::DEFAULT_ALPHABET, &mut rng);

    assert_eq!(board.tile_count(), def.mask.playable_count());
    for row in [0, 1, 3, 4] {
        assert!(board.tile_at(Cell::new(row, 2)).is_none());
    }
    assert!(find_matches(&board).is_empty());
}

/// The same seed produces the same board.
#[test]
fn test_fill_is_deterministic() {
    let mask = create_mask(6, 6, 1);
    let a = Board::fill_grid_no_matches(&mask, &Letter::DEFAULT_ALPHABET, &mut GameRng::new(9));
    let b = Board::fill_grid_no_matches(&mask, &Letter::DEFAULT_ALPHABET, &mut GameRng::new(9));
    assert_eq!(a.to_rows(), b.to_rows());
}

// =============================================================================
// Collapse and refill
// =============================================================================

/// Survivors fall past a void and keep their order; the top slot refills.
#[test]
fn test_collapse_across_void() {
    let mut board = Board::from_rows(&["A", "#", "B", "."]);
    let a = board.tile_id_at(Cell::new(0, 0)).unwrap();
    let b = board.tile_id_at(Cell::new(2, 0)).unwrap();

    let report = collapse_existing_tiles(&mut board);

    assert_eq!(report.moves.len(), 2);
    assert_eq!(report.moves[0].tile, b);
    assert_eq!(report.moves[0].to, Cell::new(3, 0));
    assert_eq!(report.moves[1].tile, a);
    assert_eq!(report.moves[1].from, Cell::new(0, 0));
    assert_eq!(report.moves[1].to, Cell::new(2, 0));
    assert_eq!(report.empty_slots, vec![Cell::new(0, 0)]);
    assert!(report.spawned.is_empty());
    assert_eq!(board.to_rows(), vec![".", "#", "A", "B"]);

    let spawned = refill_empty_slots(&mut board, &report.empty_slots, &[Letter('Z')], &mut ScriptedRng::constant(0.0));
    assert_eq!(spawned.len(), 1);
    assert_eq!(board.to_rows(), vec!["Z", "#", "A", "B"]);
}

/// Tiles already resting on the bottom produce no moves.
#[test]
fn test_collapse_settled_column_is_noop() {
    let mut board = Board::from_rows(&["AB", "CD"]);
    let report = collapse_columns(&mut board, &[Letter('E')], &mut GameRng::new(1));
    assert!(report.is_noop());
    assert_eq!(board.to_rows(), vec!["AB", "CD"]);
}

/// A moved tile keeps its identity and its power-up.
#[test]
fn test_collapse_preserves_identity() {
    use letter_cascade::board::PowerUp;

    let mut board = Board::from_rows(&["C", "A", "."]);
    board.set_power_up(Cell::new(1, 0), PowerUp::color_clear());
    let id = board.tile_id_at(Cell::new(1, 0)).unwrap();

    collapse_columns(&mut board, &[Letter('D')], &mut ScriptedRng::constant(0.0));

    let tile = board.tile(id).unwrap();
    assert_eq!(tile.cell(), Cell::new(2, 0));
    assert!(tile.is_power_up());
    assert_eq!(board.to_rows(), vec!["D", "C", "A"]);
}

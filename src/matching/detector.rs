//! Run detection.
//!
//! Every row and every column is run-length encoded by letter. Empty and
//! void cells always end a run and never extend one. Each maximal run of
//! [`MIN_RUN_LENGTH`] or more becomes one [`MatchRun`] and contributes its
//! cells to the flat clear set. Nothing is cached between passes.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, Letter};
use crate::core::{Cell, Orientation};

/// Shortest run that counts as a match.
pub const MIN_RUN_LENGTH: usize = 3;

/// A maximal same-letter run along one row or column.
///
/// Cells are ordered left to right for horizontal runs and top to bottom
/// for vertical runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub cells: SmallVec<[Cell; 5]>,
    pub length: usize,
    pub orientation: Orientation,
    pub letter: Letter,
}

impl MatchRun {
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}

/// Output of one detection pass.
#[derive(Clone, Debug, Default)]
pub struct MatchScan {
    /// Every cell belonging to at least one run.
    pub cleared: FxHashSet<Cell>,
    /// Runs in detection order: rows top to bottom, then columns left to right.
    pub runs: Vec<MatchRun>,
}

impl MatchScan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Cleared cells in row-major order, for stable iteration.
    #[must_use]
    pub fn sorted_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.cleared.iter().copied().collect();
        cells.sort_unstable();
        cells
    }
}

/// Scan the whole board for runs.
///
/// ```
/// use letter_cascade::board::Board;
/// use letter_cascade::matching::find_matches;
///
/// let board = Board::from_rows(&["AAA", "BCD", "BCE"]);
/// let scan = find_matches(&board);
/// assert_eq!(scan.cleared.len(), 3);
/// assert_eq!(scan.runs.len(), 1);
/// ```
#[must_use]
pub fn find_matches(board: &Board) -> MatchScan {
    let mut scan = MatchScan::default();

    for row in 0..board.rows() {
        let line = (0..board.cols()).map(|col| Cell::new(row, col));
        scan_line(board, line, Orientation::Horizontal, &mut scan);
    }
    for col in 0..board.cols() {
        let line = (0..board.rows()).map(|row| Cell::new(row, col));
        scan_line(board, line, Orientation::Vertical, &mut scan);
    }

    scan
}

fn scan_line(board: &Board, line: impl Iterator<Item = Cell>, orientation: Orientation, scan: &mut MatchScan) {
    let mut run: SmallVec<[Cell; 5]> = SmallVec::new();
    let mut run_letter: Option<Letter> = None;

    for cell in line {
        let letter = board.letter_at(cell);
        if letter.is_some() && letter == run_letter {
            run.push(cell);
            continue;
        }
        flush_run(&mut run, run_letter, orientation, scan);
        run_letter = letter;
        if letter.is_some() {
            run.push(cell);
        }
    }
    flush_run(&mut run, run_letter, orientation, scan);
}

fn flush_run(run: &mut SmallVec<[Cell; 5]>, letter: Option<Letter>, orientation: Orientation, scan: &mut MatchScan) {
    if let Some(letter) = letter {
        if run.len() >= MIN_RUN_LENGTH {
            scan.cleared.extend(run.iter().copied());
            scan.runs.push(MatchRun {
                cells: run.clone(),
                length: run.len(),
                orientation,
                letter,
            });
        }
    }
    run.clear();
}

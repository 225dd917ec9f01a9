//! Letter-value scoring.
//!
//! Each letter is worth a power of ten keyed to its alphabet position: the
//! first letter scores 10², the second 10³, and so on. The table is fixed
//! per session but injectable through configuration overrides.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Letter};
use crate::core::Cell;

/// Exponent of the first letter's value.
const BASE_EXPONENT: u32 = 2;

/// Mapping from letter to points per cleared tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterValues {
    values: FxHashMap<Letter, u64>,
}

impl LetterValues {
    /// The default table for an alphabet: `10^(2 + position)`.
    ///
    /// Values saturate at `u64::MAX` for very long alphabets.
    #[must_use]
    pub fn for_alphabet(alphabet: &[Letter]) -> Self {
        let values = alphabet
            .iter()
            .zip(0u32..)
            .map(|(&letter, position)| {
                let value = 10u64.checked_pow(BASE_EXPONENT + position).unwrap_or(u64::MAX);
                (letter, value)
            })
            .collect();
        Self { values }
    }

    /// Override or add the value of one letter.
    #[must_use]
    pub fn with_value(mut self, letter: Letter, value: u64) -> Self {
        self.values.insert(letter, value);
        self
    }

    /// Points for one tile of `letter`. Unknown letters score nothing.
    #[must_use]
    pub fn value(&self, letter: Letter) -> u64 {
        self.values.get(&letter).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Sum the letter values of the tiles currently in `cells`.
///
/// Must be called before the cells are cleared. Empty cells score nothing.
pub fn score_matches<'a>(board: &Board, cells: impl IntoIterator<Item = &'a Cell>, values: &LetterValues) -> u64 {
    cells
        .into_iter()
        .filter_map(|&cell| board.letter_at(cell))
        .fold(0u64, |total, letter| total.saturating_add(values.value(letter)))
}

/// Extra points for a power-up-to-power-up combo.
#[must_use]
pub fn combo_bonus(cleared_points: u64, multiplier: f64) -> u64 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return 0;
    }
    (cleared_points as f64 * multiplier).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::find_matches;

    fn alphabet() -> Vec<Letter> {
        Letter::DEFAULT_ALPHABET.to_vec()
    }

    #[test]
    fn test_powers_of_ten_by_position() {
        let values = LetterValues::for_alphabet(&alphabet());
        assert_eq!(values.value(Letter('A')), 100);
        assert_eq!(values.value(Letter('B')), 1_000);
        assert_eq!(values.value(Letter('E')), 1_000_000);
        assert_eq!(values.value(Letter('Z')), 0);
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_saturates_for_long_alphabets() {
        let long: Vec<Letter> = ('a'..='z').map(Letter).collect();
        let values = LetterValues::for_alphabet(&long);
        assert_eq!(values.value(Letter('z')), u64::MAX);
    }

    #[test]
    fn test_score_three_a_tiles() {
        let board = Board::from_rows(&["AAA", "BCD", "EBC"]);
        let scan = find_matches(&board);
        let values = LetterValues::default().with_value(Letter('A'), 100);

        assert_eq!(score_matches(&board, &scan.cleared, &values), 300);
    }

    #[test]
    fn test_empty_cells_score_nothing() {
        let board = Board::from_rows(&["A.B"]);
        let values = LetterValues::for_alphabet(&alphabet());
        let cells = [Cell::new(0, 0), Cell::new(0, 1)];
        assert_eq!(score_matches(&board, &cells, &values), 100);
    }

    #[test]
    fn test_combo_bonus_rounds() {
        assert_eq!(combo_bonus(300, 0.5), 150);
        assert_eq!(combo_bonus(3, 0.5), 2);
        assert_eq!(combo_bonus(300, 0.0), 0);
        assert_eq!(combo_bonus(300, f64::NAN), 0);
    }
}

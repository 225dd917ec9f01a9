//! Playability masks and board definitions.
//!
//! A mask marks every cell as playable (`1`) or void (`0`). Masks arrive from
//! untrusted board definitions, so [`normalize_mask`] accepts any JSON value:
//! a correctly shaped input is coerced cell by cell to 0/1, anything else is
//! replaced wholesale by an all-playable mask. Masks are never partially
//! repaired.
//!
//! ```
//! use letter_cascade::board::normalize_mask;
//! use serde_json::json;
//!
//! let mask = normalize_mask(&json!([[1, 0], [1, "1"]]), 2, 2);
//! assert_eq!(mask.to_rows(), vec![vec![1, 0], vec![1, 1]]);
//!
//! let fallback = normalize_mask(&json!([[1]]), 2, 2);
//! assert_eq!(fallback.to_rows(), vec![vec![1, 1], vec![1, 1]]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Cell;

/// Side length used when a board definition is missing or unusable.
pub const DEFAULT_GRID_SIZE: usize = 3;

/// Rectangular playability grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mask {
    rows: usize,
    cols: usize,
    playable: Vec<bool>,
}

impl Mask {
    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the cell is inside the mask and playable.
    #[must_use]
    pub fn is_playable(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.playable[cell.row * self.cols + cell.col]
    }

    /// True when the cell is inside the mask and void.
    #[must_use]
    pub fn is_void(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && !self.playable[cell.row * self.cols + cell.col]
    }

    /// True when there is exactly one entry per cell.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.playable.len())
    }

    /// Number of playable cells.
    #[must_use]
    pub fn playable_count(&self) -> usize {
        self.playable.iter().filter(|&&p| p).count()
    }

    /// Row-major 0/1 view.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.playable
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().map(|&p| u8::from(p)).collect())
            .collect()
    }
}

/// Create a `rows × cols` mask where every cell is `fill` (coerced to 0/1).
#[must_use]
pub fn create_mask(rows: usize, cols: usize, fill: u8) -> Mask {
    Mask {
        rows,
        cols,
        playable: vec![fill == 1; rows * cols],
    }
}

/// Reinterpret `raw` as a `rows × cols` mask.
///
/// Accepted only if `raw` is an array of exactly `rows` arrays of exactly
/// `cols` values each. Values equal to one (`1`, `1.0`, `"1"`, `true`) become
/// playable, everything else void. Any shape mismatch yields an all-playable
/// mask.
#[must_use]
pub fn normalize_mask(raw: &Value, rows: usize, cols: usize) -> Mask {
    let Some(source_rows) = raw.as_array() else {
        return create_mask(rows, cols, 1);
    };
    if source_rows.len() != rows {
        return create_mask(rows, cols, 1);
    }

    let mut playable = Vec::with_capacity(rows * cols);
    for source_row in source_rows {
        match source_row.as_array() {
            Some(values) if values.len() == cols => {
                playable.extend(values.iter().map(is_one));
            }
            _ => return create_mask(rows, cols, 1),
        }
    }

    Mask { rows, cols, playable }
}

/// Typed variant of [`normalize_mask`] for masks already held as integers.
#[must_use]
pub fn normalize_mask_rows(raw: &[Vec<u8>], rows: usize, cols: usize) -> Mask {
    if raw.len() != rows || raw.iter().any(|row| row.len() != cols) {
        return create_mask(rows, cols, 1);
    }
    Mask {
        rows,
        cols,
        playable: raw.iter().flatten().map(|&v| v == 1).collect(),
    }
}

fn is_one(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().parse::<f64>().map_or(false, |v| v == 1.0),
        _ => false,
    }
}

/// Board shape ingested from a level definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    pub rows: usize,
    pub cols: usize,
    pub mask: Mask,
}

impl Default for BoardDefinition {
    fn default() -> Self {
        Self::square(DEFAULT_GRID_SIZE)
    }
}

impl BoardDefinition {
    /// An all-playable square board.
    #[must_use]
    pub fn square(size: usize) -> Self {
        Self {
            rows: size,
            cols: size,
            mask: create_mask(size, size, 1),
        }
    }

    /// Build from `{ rows, cols, mask }`.
    ///
    /// Missing or non-positive dimensions fall back to the default square
    /// board; the mask is normalized against the resolved dimensions.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let dimension = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .filter(|&n| n > 0)
                .and_then(|n| usize::try_from(n).ok())
        };

        match (dimension("rows"), dimension("cols")) {
            (Some(rows), Some(cols)) => {
                let mask = value
                    .get("mask")
                    .map_or_else(|| create_mask(rows, cols, 1), |raw| normalize_mask(raw, rows, cols));
                Self { rows, cols, mask }
            }
            _ => Self::default(),
        }
    }

    /// Parse a JSON board definition, falling back to the default on any error.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str::<Value>(json).map_or_else(|_| Self::default(), |value| Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_keeps_valid_mask() {
        let mask = normalize_mask(&json!([[1, 0], [1, 1]]), 2, 2);
        assert_eq!(mask.to_rows(), vec![vec![1, 0], vec![1, 1]]);
        assert!(mask.is_void(Cell::new(0, 1)));
        assert!(mask.is_playable(Cell::new(1, 1)));
    }

    #[test]
    fn test_normalize_coerces_values() {
        let mask = normalize_mask(&json!([[2, "1", true], [null, "x", 1.0]]), 2, 3);
        assert_eq!(mask.to_rows(), vec![vec![0, 1, 1], vec![0, 0, 1]]);
    }

    #[test]
    fn test_normalize_falls_back_on_shape() {
        let full = create_mask(2, 2, 1);
        assert_eq!(normalize_mask(&json!([[1]]), 2, 2), full);
        assert_eq!(normalize_mask(&json!([[1, 0], [1]]), 2, 2), full);
        assert_eq!(normalize_mask(&json!([[1, 0], 5]), 2, 2), full);
        assert_eq!(normalize_mask(&json!("mask"), 2, 2), full);
        assert_eq!(normalize_mask(&Value::Null, 2, 2), full);
    }

    #[test]
    fn test_normalize_rows_typed() {
        let mask = normalize_mask_rows(&[vec![1, 0, 7]], 1, 3);
        assert_eq!(mask.to_rows(), vec![vec![1, 0, 0]]);
        assert_eq!(normalize_mask_rows(&[vec![1, 0]], 1, 3), create_mask(1, 3, 1));
    }

    #[test]
    fn test_out_of_bounds_is_neither_playable_nor_void() {
        let mask = create_mask(2, 2, 1);
        assert!(!mask.is_playable(Cell::new(2, 0)));
        assert!(!mask.is_void(Cell::new(0, 2)));
    }

    #[test]
    fn test_board_definition_from_json() {
        let def = BoardDefinition::from_json(r#"{"rows": 2, "cols": 3, "mask": [[1,1,1],[0,1,0]]}"#);
        assert_eq!((def.rows, def.cols), (2, 3));
        assert_eq!(def.mask.playable_count(), 4);

        let no_mask = BoardDefinition::from_json(r#"{"rows": 4, "cols": 4}"#);
        assert_eq!(no_mask.mask.playable_count(), 16);
    }

    #[test]
    fn test_board_definition_fallbacks() {
        assert_eq!(BoardDefinition::from_json("not json"), BoardDefinition::default());
        assert_eq!(BoardDefinition::from_json(r#"{"rows": 0, "cols": 3}"#), BoardDefinition::default());
        assert_eq!(BoardDefinition::from_json(r#"{"rows": "4", "cols": 3}"#), BoardDefinition::default());
        assert_eq!(BoardDefinition::default().rows, DEFAULT_GRID_SIZE);
    }
}

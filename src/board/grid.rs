//! The board: an arena of tiles addressed through a row-major slot grid.
//!
//! Slots hold `TileId` handles; the tiles themselves live in an arena keyed
//! by id. Moving a tile rewrites its slot and its `row`/`col` fields, never
//! the tile's identity. Void cells (mask 0) are never written.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::mask::{normalize_mask_rows, Mask};
use super::tile::{Letter, PowerUp, Tile};
use crate::core::{Cell, RandomSource, TileId};

/// A rows × cols grid of tiles shaped by a [`Mask`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    mask: Mask,
    slots: Vec<Option<TileId>>,
    tiles: FxHashMap<TileId, Tile>,
    next_id: TileId,
}

impl Board {
    /// A board with no tiles at all.
    #[must_use]
    pub fn empty(mask: Mask) -> Self {
        let slots = vec![None; mask.rows() * mask.cols()];
        Self {
            mask,
            slots,
            tiles: FxHashMap::default(),
            next_id: TileId::FIRST,
        }
    }

    /// Fill every playable cell with a fresh tile; void cells stay empty.
    pub fn build_grid(mask: &Mask, mut letter_for: impl FnMut(Cell) -> Letter) -> Self {
        let mut board = Self::empty(mask.clone());
        for cell in board.cells() {
            if board.mask.is_playable(cell) {
                board.spawn_tile(cell, letter_for(cell));
            }
        }
        board
    }

    /// Fill left-to-right, top-to-bottom without creating 3-runs.
    ///
    /// For each cell, a letter is excluded when the two already-placed
    /// neighbors to the left, or the two above, share it. If every letter is
    /// excluded the full alphabet is used instead, which may seed a match;
    /// the first resolution pass clears it.
    pub fn fill_grid_no_matches(mask: &Mask, alphabet: &[Letter], rng: &mut impl RandomSource) -> Self {
        let mut board = Self::empty(mask.clone());
        if alphabet.is_empty() {
            return board;
        }

        for cell in board.cells() {
            if !board.mask.is_playable(cell) {
                continue;
            }

            let mut forbidden: [Option<Letter>; 2] = [None, None];
            if cell.col >= 2 {
                forbidden[0] = board.pair_letter(Cell::new(cell.row, cell.col - 1), Cell::new(cell.row, cell.col - 2));
            }
            if cell.row >= 2 {
                forbidden[1] = board.pair_letter(Cell::new(cell.row - 1, cell.col), Cell::new(cell.row - 2, cell.col));
            }

            let options: Vec<Letter> = alphabet
                .iter()
                .copied()
                .filter(|letter| !forbidden.contains(&Some(*letter)))
                .collect();
            let pool = if options.is_empty() { alphabet } else { &options[..] };
            let letter = pool[rng.pick_index(pool.len())];
            board.spawn_tile(cell, letter);
        }

        board
    }

    /// Parse a board from text rows: a letter is a tile, `.` an empty
    /// playable cell and `#` a void cell. Ragged input is padded with voids.
    ///
    /// ```
    /// use letter_cascade::board::Board;
    /// use letter_cascade::core::Cell;
    ///
    /// let board = Board::from_rows(&["AB#", "C.D"]);
    /// assert!(board.mask().is_void(Cell::new(0, 2)));
    /// assert!(board.tile_at(Cell::new(1, 1)).is_none());
    /// assert_eq!(board.letter_at(Cell::new(1, 2)).map(|l| l.0), Some('D'));
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        let raw: Vec<Vec<u8>> = grid
            .iter()
            .map(|row| (0..cols).map(|c| u8::from(row.get(c).is_some_and(|&ch| ch != '#'))).collect())
            .collect();
        let mask = normalize_mask_rows(&raw, grid.len(), cols);

        let mut board = Self::empty(mask);
        for (r, row) in grid.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                if ch != '#' && ch != '.' {
                    board.spawn_tile(Cell::new(r, c), Letter(ch));
                }
            }
        }
        board
    }

    /// Build from a row-major letter view where `None` marks a void cell.
    ///
    /// [`Board::letters`] also reports empty playable cells as `None`, so
    /// feeding its output back here turns those cells void. Use
    /// [`Board::with_letters`] with the original mask to keep them.
    #[must_use]
    pub fn from_letters(letters: &[Vec<Option<Letter>>]) -> Self {
        let cols = letters.iter().map(Vec::len).max().unwrap_or(0);
        let raw: Vec<Vec<u8>> = letters
            .iter()
            .map(|row| (0..cols).map(|c| u8::from(matches!(row.get(c), Some(Some(_))))).collect())
            .collect();
        let mask = normalize_mask_rows(&raw, letters.len(), cols);
        Self::with_letters(mask, letters)
    }

    /// Place `letters` on a board shaped by `mask`.
    ///
    /// `None` leaves a cell empty; letters over void or off-mask cells are
    /// ignored. `Board::with_letters(b.mask().clone(), &b.letters())`
    /// reproduces the layout of `b`.
    #[must_use]
    pub fn with_letters(mask: Mask, letters: &[Vec<Option<Letter>>]) -> Self {
        let mut board = Self::empty(mask);
        for (r, row) in letters.iter().enumerate() {
            for (c, letter) in row.iter().enumerate() {
                if let Some(letter) = letter {
                    board.spawn_tile(Cell::new(r, c), *letter);
                }
            }
        }
        board
    }

    /// Render back to the text form accepted by [`Board::from_rows`].
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows())
            .map(|r| {
                (0..self.cols())
                    .map(|c| {
                        let cell = Cell::new(r, c);
                        match self.letter_at(cell) {
                            Some(letter) => letter.0,
                            None if self.mask.is_void(cell) => '#',
                            None => '.',
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.mask.rows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.mask.cols()
    }

    #[must_use]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Every cell in row-major order, void cells included.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |r| (0..cols).map(move |c| Cell::new(r, c)))
    }

    /// True when the slots, the arena and the mask agree.
    ///
    /// Holds for every board built through this API. Boards decoded from
    /// outside data should be checked before use: there must be one slot
    /// per mask cell, void cells must be empty, every slotted id must name a
    /// tile that sits in that cell, and no id may reach the allocator's next
    /// id.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if !self.mask.is_well_formed() || self.slots.len() != self.mask.rows() * self.mask.cols() {
            return false;
        }
        let mut slotted = 0;
        for (cell, slot) in self.cells().zip(&self.slots) {
            let Some(id) = *slot else {
                continue;
            };
            slotted += 1;
            let backed = self.tiles.get(&id).is_some_and(|tile| tile.id == id && tile.cell() == cell);
            if !backed || !self.mask.is_playable(cell) || id >= self.next_id {
                return false;
            }
        }
        slotted == self.tiles.len()
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Iterate over all live tiles (arena order, not board order).
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Look up a tile by id.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Handle of the tile occupying a cell.
    #[must_use]
    pub fn tile_id_at(&self, cell: Cell) -> Option<TileId> {
        self.index(cell).and_then(|i| self.slots[i])
    }

    #[must_use]
    pub fn tile_at(&self, cell: Cell) -> Option<&Tile> {
        self.tile_id_at(cell).and_then(|id| self.tiles.get(&id))
    }

    pub fn tile_at_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        let id = self.tile_id_at(cell)?;
        self.tiles.get_mut(&id)
    }

    #[must_use]
    pub fn letter_at(&self, cell: Cell) -> Option<Letter> {
        self.tile_at(cell).map(|t| t.letter)
    }

    /// Row-major letter view (`None` for empty and void cells).
    #[must_use]
    pub fn letters(&self) -> Vec<Vec<Option<Letter>>> {
        (0..self.rows())
            .map(|r| (0..self.cols()).map(|c| self.letter_at(Cell::new(r, c))).collect())
            .collect()
    }

    /// Place a freshly constructed tile in an empty playable cell.
    ///
    /// Returns `None` when the cell is void, occupied or off the board.
    pub fn spawn_tile(&mut self, cell: Cell, letter: Letter) -> Option<TileId> {
        if !self.mask.is_playable(cell) || self.tile_id_at(cell).is_some() {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.next();
        self.tiles.insert(id, Tile::new(id, cell, letter));
        let index = self.index(cell)?;
        self.slots[index] = Some(id);
        Some(id)
    }

    /// Remove and return the tile in a cell.
    pub fn remove(&mut self, cell: Cell) -> Option<Tile> {
        let index = self.index(cell)?;
        let id = self.slots[index].take()?;
        self.tiles.remove(&id)
    }

    /// Remove every tile in `cells`, returning the removed tiles.
    pub fn clear_cells<'a>(&mut self, cells: impl IntoIterator<Item = &'a Cell>) -> Vec<Tile> {
        cells.into_iter().filter_map(|&cell| self.remove(cell)).collect()
    }

    /// Both cells are on the board and one step apart orthogonally.
    #[must_use]
    pub fn is_adjacent(&self, a: Cell, b: Cell) -> bool {
        self.index(a).is_some() && self.index(b).is_some() && a.is_adjacent(b)
    }

    /// Exchange the tiles in two cells, rewriting their positions in place.
    ///
    /// Both cells must hold a tile. Returns false and leaves the board
    /// untouched otherwise.
    pub fn swap(&mut self, a: Cell, b: Cell) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        let (Some(id_a), Some(id_b)) = (self.slots[ia], self.slots[ib]) else {
            return false;
        };
        self.slots.swap(ia, ib);
        self.set_position(id_a, b);
        self.set_position(id_b, a);
        true
    }

    /// Attach (or replace) the power-up on the tile in `cell`.
    pub fn set_power_up(&mut self, cell: Cell, power_up: PowerUp) -> bool {
        match self.tile_at_mut(cell) {
            Some(tile) => {
                tile.power_up = Some(power_up);
                true
            }
            None => false,
        }
    }

    /// Move a tile to an empty playable cell. Used by collapse.
    pub(crate) fn relocate(&mut self, id: TileId, to: Cell) {
        let Some(from) = self.tiles.get(&id).map(Tile::cell) else {
            return;
        };
        if from == to || !self.mask.is_playable(to) {
            return;
        }
        if let (Some(i_from), Some(i_to)) = (self.index(from), self.index(to)) {
            self.slots[i_from] = None;
            self.slots[i_to] = Some(id);
            self.set_position(id, to);
        }
    }

    fn set_position(&mut self, id: TileId, cell: Cell) {
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.row = cell.row;
            tile.col = cell.col;
        }
    }

    fn pair_letter(&self, a: Cell, b: Cell) -> Option<Letter> {
        match (self.letter_at(a), self.letter_at(b)) {
            (Some(x), Some(y)) if x == y => Some(x),
            _ => None,
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows() && cell.col < self.cols()).then(|| cell.row * self.cols() + cell.col)
    }
}

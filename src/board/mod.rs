//! Board model: masks, tiles, the tile grid, and collapse/refill.
//!
//! ## Key Components
//!
//! - [`Mask`] / [`normalize_mask`]: playability grid from untrusted input
//! - [`Tile`] / [`PowerUp`]: lettered tiles and their special abilities
//! - [`Board`]: arena of tiles addressed by cell, never writing void cells
//! - [`collapse_columns`]: gravity plus refill, reporting per-tile motion

mod collapse;
mod grid;
mod mask;
mod tile;

pub use collapse::{collapse_columns, collapse_existing_tiles, refill_empty_slots, CollapseReport, TileMove, TileSpawn};
pub use grid::Board;
pub use mask::{create_mask, normalize_mask, normalize_mask_rows, BoardDefinition, Mask, DEFAULT_GRID_SIZE};
pub use tile::{Letter, PowerUp, PowerUpKind, Tile};

//! Core engine types: cells, tile handles, RNG and configuration.

pub mod cell;
pub mod config;
pub mod entity;
pub mod lenient;
pub mod rng;

pub use cell::{Cell, Orientation};
pub use config::{
    EngineConfig, RawConfig, DEFAULT_COMBO_BONUS_MULTIPLIER, DEFAULT_MAX_CASCADE_DEPTH, DEFAULT_SEED,
};
pub use entity::TileId;
pub use rng::{GameRng, GameRngState, RandomSource, ScriptedRng};

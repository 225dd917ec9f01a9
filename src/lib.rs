//! # letter-cascade
//!
//! Resolution engine for a lettered tile-matching puzzle.
//!
//! ## Design Principles
//!
//! 1. **Degrade, Don't Fail**: Malformed masks, boards and configs fall back
//!    to defined defaults. Reward pipelines with bad config produce nothing.
//!
//! 2. **Injectable Randomness**: Every fill, refill and loot roll takes a
//!    `RandomSource`, so a seed replays a session exactly.
//!
//! 3. **Suspension Points**: The resolution loop is a step machine. Callers
//!    pause between clear and collapse, and between cascades, for animation.
//!
//! ## Architecture
//!
//! - **Tile Arena**: Tiles are addressed by `TileId`; moving a tile rewrites
//!   its position, never its identity.
//!
//! - **Session Counters**: Event ids, loot caps and the one-shot reward live
//!   in explicit session state threaded through pure functions.
//!
//! ## Modules
//!
//! - `core`: Cells, tile handles, RNG, configuration
//! - `board`: Masks, tiles, the board, collapse and refill
//! - `matching`: Run detection, power-ups, line-clear combos
//! - `resolve`: Scoring, match events, the cascade loop
//! - `rewards`: Weighted loot and the first 5-run reward
//! - `session`: The caller layer tying it all together

pub mod board;
pub mod core;
pub mod matching;
pub mod resolve;
pub mod rewards;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Cell, EngineConfig, GameRng, GameRngState, Orientation, RandomSource, RawConfig, ScriptedRng, TileId};

pub use crate::board::{
    collapse_columns, create_mask, normalize_mask, Board, BoardDefinition, CollapseReport, Letter, Mask, PowerUp,
    PowerUpKind, Tile,
};

pub use crate::matching::{
    activate_line_clear_combo, find_matches, select_match_power_up_cell, ComboOutcome, MatchRun, MatchScan,
    PowerUpSpawn,
};

pub use crate::resolve::{
    resolve_board, score_matches, Cascade, CascadeStep, EventBus, EventCounter, LetterValues, MatchEvent,
    MatchEventSubscriber,
};

pub use crate::rewards::{
    apply_match4_loot_drops, apply_match5_bonus_loot, pick_weighted_choice, should_trigger_first_match5_reward,
    LootDrop, LootSession, LootTable, MicroRewardConfig, MicroRewardState, WeightedItem,
};

pub use crate::session::{GameSession, SessionSnapshot, SessionStats, SwapDriver, SwapOutcome, SwapStep};

//! Reward pipelines reacting to match event batches.
//!
//! Nothing here touches the board. Each pipeline reads a batch, consults
//! its session state and returns plain records for the caller.
//!
//! ## Key Components
//!
//! - [`pick_weighted_choice`]: cumulative-weight selection from a uniform draw
//! - [`apply_match4_loot_drops`] / [`apply_match5_bonus_loot`]: session-capped loot
//! - [`MicroRewardState`]: one-shot reward for the first 5-run

mod loot;
mod micro;
mod weighted;

pub use loot::{
    apply_match4_loot_drops, apply_match5_bonus_loot, LootDrop, LootSession, LootSource, LootTable, RawLootConfig,
    RawLootType,
};
pub use micro::{
    should_trigger_first_match5_reward, MicroRewardConfig, MicroRewardFired, MicroRewardState, RawMicroRewardConfig,
};
pub use weighted::{choose_weighted, format_loot_label, pick_weighted_choice, WeightedItem};

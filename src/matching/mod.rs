//! Matching: run detection, power-up spawning and line-clear combos.
//!
//! ## Key Components
//!
//! - [`find_matches`]: row/column run scan producing [`MatchScan`]
//! - [`plan_power_ups`] / [`apply_power_ups`]: 4-runs and 5-runs leave a
//!   power-up behind
//! - [`activate_line_clear_combo`]: swaps involving a line clear wipe lines
//!   instead of matching

mod combo;
mod detector;
mod powerup;

pub use combo::{activate_line_clear_combo, build_line_clear_set, is_combo_swap, ComboOutcome};
pub use detector::{find_matches, MatchRun, MatchScan, MIN_RUN_LENGTH};
pub use powerup::{apply_power_ups, plan_power_ups, power_up_for_length, select_match_power_up_cell, PowerUpSpawn};

//! Session statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a game session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Legal swaps committed to the board.
    pub swaps_attempted: u32,

    /// Swaps undone because nothing matched.
    pub swaps_reverted: u32,

    /// Clear phases across all resolution loops.
    pub cascades: u32,

    /// Most clear phases in a single loop.
    pub longest_cascade: u32,

    /// Loops stopped by the depth limit.
    pub truncated_loops: u32,

    /// Tiles removed by matches and combos.
    pub tiles_cleared: u64,

    pub power_ups_spawned: u32,

    /// Line-clear combos fired.
    pub combos: u32,

    pub loot_drops: u32,

    pub rewards_fired: u32,
}

impl SessionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of swaps that were kept.
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.swaps_attempted == 0 {
            0.0
        } else {
            f64::from(self.swaps_attempted - self.swaps_reverted) / f64::from(self.swaps_attempted)
        }
    }

    /// Average clear phases per committed swap.
    #[must_use]
    pub fn avg_cascades_per_swap(&self) -> f64 {
        if self.swaps_attempted == 0 {
            0.0
        } else {
            f64::from(self.cascades) / f64::from(self.swaps_attempted)
        }
    }

    pub(crate) fn record_loop(&mut self, cascades: u32, truncated: bool) {
        self.longest_cascade = self.longest_cascade.max(cascades);
        if truncated {
            self.truncated_loops += 1;
        }
    }
}

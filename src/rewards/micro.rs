//! The one-shot "first 5-run" reward.

use serde::{Deserialize, Serialize};

use crate::core::lenient;
use crate::resolve::MatchEvent;

/// Raw `firstMatch5Reward` config section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMicroRewardConfig {
    #[serde(deserialize_with = "lenient::boolean")]
    pub enabled: Option<bool>,
    #[serde(deserialize_with = "lenient::number")]
    pub cooldown_ms: Option<f64>,
}

/// Resolved micro reward settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroRewardConfig {
    pub cooldown_ms: u64,
}

impl MicroRewardConfig {
    #[must_use]
    pub fn new(cooldown_ms: u64) -> Self {
        Self { cooldown_ms }
    }

    /// `None` when disabled. A negative or non-finite cooldown reads as 0.
    #[must_use]
    pub fn from_raw(raw: &RawMicroRewardConfig) -> Option<Self> {
        if raw.enabled == Some(false) {
            return None;
        }
        let cooldown = raw.cooldown_ms.filter(|ms| ms.is_finite() && *ms > 0.0).unwrap_or(0.0);
        Some(Self::new(cooldown.floor().min(u64::MAX as f64) as u64))
    }
}

/// Notification that the reward fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroRewardFired {
    /// The 5-run that earned it.
    pub event_id: u64,
    pub at_ms: u64,
}

/// Session gate: fires at most once until [`MicroRewardState::reset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroRewardState {
    pub triggered: bool,
    pub last_triggered_at: Option<u64>,
}

impl MicroRewardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check a batch and record the firing if it qualifies.
    pub fn observe(&mut self, events: &[MatchEvent], config: &MicroRewardConfig, now_ms: u64) -> Option<MicroRewardFired> {
        if !should_trigger_first_match5_reward(events, self.triggered, self.last_triggered_at, now_ms, config.cooldown_ms) {
            return None;
        }
        let event = events.iter().find(|e| e.length == 5)?;
        self.triggered = true;
        self.last_triggered_at = Some(now_ms);
        Some(MicroRewardFired { event_id: event.id, at_ms: now_ms })
    }
}

/// True when the batch holds a 5-run, the reward never fired, and the
/// cooldown since the last firing has elapsed.
///
/// A clock that runs backwards counts as zero elapsed time.
#[must_use]
pub fn should_trigger_first_match5_reward(
    events: &[MatchEvent],
    already_triggered: bool,
    last_triggered_at: Option<u64>,
    now_ms: u64,
    cooldown_ms: u64,
) -> bool {
    if already_triggered || !events.iter().any(|e| e.length == 5) {
        return false;
    }
    match last_triggered_at {
        Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        None => true,
    }
}

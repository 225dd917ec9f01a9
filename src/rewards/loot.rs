//! Session-capped loot drops for 4-runs and 5-runs.
//!
//! Both pipelines react to match event batches and never touch the board.
//! For each qualifying event, in batch order, the pipeline rolls one item
//! from its weighted table until its session cap is reached. The two
//! pipelines keep independent counters in the shared [`LootSession`].

use im::Vector;
use serde::{Deserialize, Serialize};

use super::weighted::{choose_weighted, format_loot_label, WeightedItem};
use crate::core::{lenient, RandomSource};
use crate::resolve::MatchEvent;

/// Loot table configuration as it arrives from a config file.
///
/// Every field is optional; see [`LootTable::from_raw`] for the merge rules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawLootConfig {
    #[serde(deserialize_with = "lenient::boolean")]
    pub enabled: Option<bool>,
    #[serde(deserialize_with = "lenient::number")]
    pub session_cap: Option<f64>,
    #[serde(deserialize_with = "lenient::list")]
    pub types: Option<Vec<RawLootType>>,
}

/// One `{ id, weight }` entry of a raw loot table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLootType {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub weight: Option<f64>,
}

/// A resolved, usable loot table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub session_cap: u32,
    pub types: Vec<WeightedItem>,
}

impl LootTable {
    /// Create a table directly. Unusable weights are dropped.
    ///
    /// Returns `None` if no entry has a usable weight.
    #[must_use]
    pub fn new(session_cap: u32, types: Vec<WeightedItem>) -> Option<Self> {
        let types: Vec<WeightedItem> = types.into_iter().filter(WeightedItem::is_usable).collect();
        if types.is_empty() {
            return None;
        }
        Some(Self { session_cap, types })
    }

    /// Resolve a raw config.
    ///
    /// - `enabled` defaults to true; `false` disables the pipeline
    /// - `sessionCap` must be finite and non-negative (fractions round down);
    ///   missing defaults to 0, i.e. no drops
    /// - entries need an id and a finite positive weight
    ///
    /// Any failure yields `None`: the pipeline produces nothing.
    #[must_use]
    pub fn from_raw(raw: &RawLootConfig) -> Option<Self> {
        if raw.enabled == Some(false) {
            return None;
        }
        let cap = raw.session_cap.unwrap_or(0.0);
        if !cap.is_finite() || cap < 0.0 {
            return None;
        }
        let session_cap = cap.floor().min(f64::from(u32::MAX)) as u32;

        let types = raw
            .types
            .iter()
            .flatten()
            .filter_map(|entry| {
                let id = entry.id.clone().filter(|id| !id.is_empty())?;
                Some(WeightedItem::new(id, entry.weight.unwrap_or(0.0)))
            })
            .collect();
        Self::new(session_cap, types)
    }
}

/// Which pipeline produced a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootSource {
    Match4,
    Match5,
}

/// A loot record appended to the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootDrop {
    pub id: u64,
    /// Loot type id from the table.
    pub kind: String,
    pub label: String,
    pub source: LootSource,
    /// The match event that earned the drop.
    pub event_id: u64,
    pub cascade_index: u32,
}

/// Per-session loot counters and drop log. Reset only on game reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootSession {
    pub match4_drop_count: u32,
    pub match5_bonus_count: u32,
    pub next_loot_id: u64,
    pub drops: Vector<LootDrop>,
}

impl Default for LootSession {
    fn default() -> Self {
        Self {
            match4_drop_count: 0,
            match5_bonus_count: 0,
            next_loot_id: 1,
            drops: Vector::new(),
        }
    }
}

impl LootSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all drops and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn counter(&mut self, source: LootSource) -> &mut u32 {
        match source {
            LootSource::Match4 => &mut self.match4_drop_count,
            LootSource::Match5 => &mut self.match5_bonus_count,
        }
    }
}

/// Roll match-4 loot for a batch of events.
pub fn apply_match4_loot_drops(
    events: &[MatchEvent],
    table: Option<&LootTable>,
    session: &mut LootSession,
    rng: &mut impl RandomSource,
) -> Vec<LootDrop> {
    apply_loot(events, 4, LootSource::Match4, table, session, rng)
}

/// Roll match-5 bonus loot for a batch of events.
pub fn apply_match5_bonus_loot(
    events: &[MatchEvent],
    table: Option<&LootTable>,
    session: &mut LootSession,
    rng: &mut impl RandomSource,
) -> Vec<LootDrop> {
    apply_loot(events, 5, LootSource::Match5, table, session, rng)
}

fn apply_loot(
    events: &[MatchEvent],
    length: usize,
    source: LootSource,
    table: Option<&LootTable>,
    session: &mut LootSession,
    rng: &mut impl RandomSource,
) -> Vec<LootDrop> {
    let Some(table) = table else {
        return Vec::new();
    };

    let mut drops = Vec::new();
    for event in events.iter().filter(|e| e.length == length) {
        if *session.counter(source) >= table.session_cap {
            break;
        }
        let Some(item) = choose_weighted(&table.types, rng) else {
            break;
        };

        let drop = LootDrop {
            id: session.next_loot_id,
            kind: item.id.clone(),
            label: format_loot_label(&item.id),
            source,
            event_id: event.id,
            cascade_index: event.cascade_index,
        };
        session.next_loot_id += 1;
        *session.counter(source) += 1;
        session.drops.push_back(drop.clone());
        drops.push(drop);
    }
    drops
}

//! Engine configuration.
//!
//! Configuration arrives as untrusted JSON and is deserialized into
//! [`RawConfig`], where every field is optional. [`EngineConfig::from_raw`]
//! then applies the merge rules once, so the rest of the engine only ever
//! sees resolved values:
//!
//! - `alphabet`: single-character strings; duplicates and malformed entries
//!   are dropped, an empty result keeps the default `A..=E`
//! - `letterValues`: per-letter overrides on top of the positional table
//! - `board`: `{ rows, cols, mask }`, normalized by [`BoardDefinition`]
//! - `comboBonusMultiplier`: finite and non-negative, default 0.5
//! - `maxCascadeDepth`: positive, default 64
//! - `seed`: default 42
//! - `match4Loot`, `match5Loot`, `firstMatch5Reward`: absent means disabled
//!
//! Numeric fields accept numeric strings (`"3"`); a field of the wrong
//! shape reads as absent (see [`lenient`](super::lenient)).
//!
//! Programmatic callers can skip JSON entirely and use the `with_*` builders.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use crate::board::{BoardDefinition, Letter};
use crate::resolve::LetterValues;
use crate::rewards::{LootTable, MicroRewardConfig, RawLootConfig, RawMicroRewardConfig};

/// Default multiplier applied to points cleared by a line-clear combo.
pub const DEFAULT_COMBO_BONUS_MULTIPLIER: f64 = 0.5;

/// Default bound on clear phases per resolution loop.
pub const DEFAULT_MAX_CASCADE_DEPTH: u32 = 64;

/// Default session seed.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration exactly as read from a config file.
///
/// Every field decodes on its own: a mistyped field reads as absent and
/// falls back to its default without disturbing its neighbours.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(deserialize_with = "lenient::list")]
    pub alphabet: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::number_map")]
    pub letter_values: Option<FxHashMap<String, f64>>,
    pub board: Option<Value>,
    #[serde(deserialize_with = "lenient::number")]
    pub combo_bonus_multiplier: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub max_cascade_depth: Option<f64>,
    #[serde(deserialize_with = "lenient::unsigned")]
    pub seed: Option<u64>,
    #[serde(deserialize_with = "lenient::section")]
    pub match4_loot: Option<RawLootConfig>,
    #[serde(deserialize_with = "lenient::section")]
    pub match5_loot: Option<RawLootConfig>,
    #[serde(deserialize_with = "lenient::section")]
    pub first_match5_reward: Option<RawMicroRewardConfig>,
}

/// Fully resolved engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub alphabet: Vec<Letter>,
    pub letter_values: LetterValues,
    pub board: BoardDefinition,
    pub combo_bonus_multiplier: f64,
    pub max_cascade_depth: u32,
    pub seed: u64,
    pub match4_loot: Option<LootTable>,
    pub match5_loot: Option<LootTable>,
    pub first_match5_reward: Option<MicroRewardConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let alphabet = Letter::DEFAULT_ALPHABET.to_vec();
        Self {
            letter_values: LetterValues::for_alphabet(&alphabet),
            alphabet,
            board: BoardDefinition::default(),
            combo_bonus_multiplier: DEFAULT_COMBO_BONUS_MULTIPLIER,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            seed: DEFAULT_SEED,
            match4_loot: None,
            match5_loot: None,
            first_match5_reward: None,
        }
    }
}

impl EngineConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse JSON config text.
    ///
    /// Text that is not a JSON object yields the default configuration.
    /// Inside an object, individual bad fields fall back one by one and a
    /// malformed reward section only disables that pipeline.
    ///
    /// ```
    /// use letter_cascade::core::EngineConfig;
    ///
    /// let config = EngineConfig::from_json(r#"{"seed": 7, "alphabet": ["X", "Y", "Z", "Y"]}"#);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.alphabet.len(), 3);
    ///
    /// assert_eq!(EngineConfig::from_json("not json"), EngineConfig::default());
    /// ```
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str::<RawConfig>(json).map_or_else(|_| Self::default(), |raw| Self::from_raw(&raw))
    }

    /// Resolve a raw config.
    #[must_use]
    pub fn from_raw(raw: &RawConfig) -> Self {
        let defaults = Self::default();

        let alphabet = raw
            .alphabet
            .as_deref()
            .map(parse_alphabet)
            .filter(|letters| !letters.is_empty())
            .unwrap_or(defaults.alphabet);

        let mut letter_values = LetterValues::for_alphabet(&alphabet);
        for (key, &value) in raw.letter_values.iter().flatten() {
            let Some(letter) = single_letter(key) else {
                continue;
            };
            if value.is_finite() && value >= 0.0 {
                letter_values = letter_values.with_value(letter, value.round().min(u64::MAX as f64) as u64);
            }
        }

        let combo_bonus_multiplier = raw
            .combo_bonus_multiplier
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(defaults.combo_bonus_multiplier);

        let max_cascade_depth = raw
            .max_cascade_depth
            .filter(|d| d.is_finite() && *d >= 1.0)
            .map_or(defaults.max_cascade_depth, |d| d.floor().min(f64::from(u32::MAX)) as u32);

        Self {
            alphabet,
            letter_values,
            board: raw.board.as_ref().map_or(defaults.board, BoardDefinition::from_value),
            combo_bonus_multiplier,
            max_cascade_depth,
            seed: raw.seed.unwrap_or(defaults.seed),
            match4_loot: raw.match4_loot.as_ref().and_then(LootTable::from_raw),
            match5_loot: raw.match5_loot.as_ref().and_then(LootTable::from_raw),
            first_match5_reward: raw.first_match5_reward.as_ref().and_then(MicroRewardConfig::from_raw),
        }
    }

    /// Set the session seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the alphabet and reset letter values to its positional table.
    ///
    /// An empty alphabet is ignored.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: impl Into<Vec<Letter>>) -> Self {
        let alphabet = alphabet.into();
        if !alphabet.is_empty() {
            self.letter_values = LetterValues::for_alphabet(&alphabet);
            self.alphabet = alphabet;
        }
        self
    }

    #[must_use]
    pub fn with_letter_values(mut self, letter_values: LetterValues) -> Self {
        self.letter_values = letter_values;
        self
    }

    #[must_use]
    pub fn with_board(mut self, board: BoardDefinition) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn with_combo_bonus_multiplier(mut self, multiplier: f64) -> Self {
        if multiplier.is_finite() && multiplier >= 0.0 {
            self.combo_bonus_multiplier = multiplier;
        }
        self
    }

    #[must_use]
    pub fn with_max_cascade_depth(mut self, depth: u32) -> Self {
        self.max_cascade_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_match4_loot(mut self, table: LootTable) -> Self {
        self.match4_loot = Some(table);
        self
    }

    #[must_use]
    pub fn with_match5_loot(mut self, table: LootTable) -> Self {
        self.match5_loot = Some(table);
        self
    }

    #[must_use]
    pub fn with_first_match5_reward(mut self, reward: MicroRewardConfig) -> Self {
        self.first_match5_reward = Some(reward);
        self
    }
}

fn single_letter(entry: &str) -> Option<Letter> {
    let mut chars = entry.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Some(Letter(c)),
        _ => None,
    }
}

fn parse_alphabet(entries: &[String]) -> Vec<Letter> {
    let mut letters: Vec<Letter> = Vec::with_capacity(entries.len());
    for letter in entries.iter().filter_map(|e| single_letter(e)) {
        if !letters.contains(&letter) {
            letters.push(letter);
        }
    }
    letters
}

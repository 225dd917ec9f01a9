//! Binary session snapshots for save/restore and replay.
//!
//! A snapshot captures everything a session needs to continue
//! deterministically: the board, both rng streams (by word position), the
//! event id counter, reward state, score, stats and event history.
//! Subscribers are not captured; they belong to the caller.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::stats::SessionStats;
use crate::board::Board;
use crate::core::GameRngState;
use crate::resolve::{EventCounter, MatchEvent};
use crate::rewards::{LootSession, MicroRewardState};

/// Serializable state of a [`GameSession`](super::GameSession).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub rng: GameRngState,
    pub loot_rng: GameRngState,
    pub counter: EventCounter,
    pub loot: LootSession,
    pub micro_reward: MicroRewardState,
    pub score: u64,
    pub stats: SessionStats,
    pub history: Vector<MatchEvent>,
}

impl SessionSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Decode bytes produced by [`SessionSnapshot::to_bytes`].
    ///
    /// Fails when the bytes decode to a board whose slots, tiles and mask
    /// disagree.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        if !snapshot.board.is_well_formed() {
            return Err(Box::new(bincode::ErrorKind::Custom(
                "snapshot board does not match its mask".to_string(),
            )));
        }
        Ok(snapshot)
    }
}

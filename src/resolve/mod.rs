//! Resolution: scoring, match events and the cascade loop.
//!
//! ## Key Components
//!
//! - [`LetterValues`] / [`score_matches`]: fixed letter-to-points table
//! - [`MatchEvent`] / [`EventCounter`]: per-run events with session-wide ids
//! - [`EventBus`]: caller-owned subscriber registry
//! - [`Cascade`]: detect, spawn, score, clear, collapse until stable

mod cascade;
mod events;
mod scoring;

pub use cascade::{
    resolve_board, Cascade, CascadeEnv, CascadeStep, ClearedStep, ResolutionState, SettledStep, SwapContext,
};
pub use events::{build_match_events, EventBus, EventCounter, MatchEvent, MatchEventSubscriber, SubscriberId};
pub use scoring::{combo_bonus, score_matches, LetterValues};

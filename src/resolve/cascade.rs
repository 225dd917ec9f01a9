//! The resolution loop as an explicit step machine.
//!
//! ```text
//! Idle <- Detecting -> Resolving -> Detecting -> ... -> Idle
//! ```
//!
//! Each call to [`Cascade::step`] performs exactly one phase and returns
//! what it did. Between steps the caller may wait as long as it likes (to
//! play clear or fall animations); the cascade keeps no borrows across
//! steps and all shared state is passed in through [`CascadeEnv`].
//!
//! A pass in `Detecting` either settles the loop or, if runs exist, plans
//! power-ups, builds the event batch, scores and clears. The following
//! `Resolving` step collapses and refills, then the loop detects again.
//!
//! ## Example
//!
//! ```
//! use letter_cascade::board::{Board, Letter};
//! use letter_cascade::core::ScriptedRng;
//! use letter_cascade::resolve::{resolve_board, Cascade, CascadeEnv, CascadeStep, EventCounter, LetterValues};
//!
//! let mut board = Board::from_rows(&["AAA", "BCB", "CBC"]);
//! let alphabet = [Letter('D'), Letter('E')];
//! let values = LetterValues::for_alphabet(&[Letter('A')]);
//! let mut rng = ScriptedRng::new(vec![0.0, 0.6, 0.0]);
//! let mut counter = EventCounter::new();
//! let mut env = CascadeEnv::new(&alphabet, &values, &mut rng, &mut counter);
//!
//! let steps = resolve_board(&mut board, &mut env, Cascade::new(None, 16));
//! assert!(matches!(steps.last(), Some(CascadeStep::Settled(s)) if s.matched && s.points == 300));
//! ```

use serde::{Deserialize, Serialize};

use super::events::{build_match_events, EventCounter, MatchEvent};
use super::scoring::{score_matches, LetterValues};
use crate::board::{collapse_columns, Board, CollapseReport, Letter};
use crate::core::{Cell, RandomSource, TileId};
use crate::matching::{apply_power_ups, find_matches, plan_power_ups, PowerUpSpawn};

/// Where the resolution loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionState {
    /// Settled; further steps are no-ops.
    Idle,
    /// Next step scans for runs.
    Detecting,
    /// Next step collapses and refills.
    Resolving,
}

/// The player's swap that started a cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapContext {
    /// Cell the dragged tile came from.
    pub origin: Cell,
    /// Cell the dragged tile landed on.
    pub destination: Cell,
}

/// Shared inputs threaded through every step.
pub struct CascadeEnv<'a, R: RandomSource> {
    pub alphabet: &'a [Letter],
    pub letter_values: &'a LetterValues,
    pub rng: &'a mut R,
    pub counter: &'a mut EventCounter,
}

impl<'a, R: RandomSource> CascadeEnv<'a, R> {
    pub fn new(
        alphabet: &'a [Letter],
        letter_values: &'a LetterValues,
        rng: &'a mut R,
        counter: &'a mut EventCounter,
    ) -> Self {
        Self {
            alphabet,
            letter_values,
            rng,
            counter,
        }
    }
}

/// Result of a clear phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedStep {
    pub cascade_index: u32,
    /// Event batch for this pass, in detection order.
    pub events: Vec<MatchEvent>,
    /// Power-ups placed this pass.
    pub spawns: Vec<PowerUpSpawn>,
    /// Cleared cells, row-major.
    pub cleared: Vec<Cell>,
    /// Handles of the tiles removed.
    pub removed: Vec<TileId>,
    pub points: u64,
}

/// Summary emitted once the loop settles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledStep {
    /// At least one run was cleared during the whole loop.
    pub matched: bool,
    /// Number of clear phases performed.
    pub cascades: u32,
    /// Total points over all clear phases.
    pub points: u64,
    /// The depth limit stopped the loop while runs remained.
    pub truncated: bool,
}

/// One phase of the resolution loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeStep {
    /// Runs were cleared; collapse follows on the next step.
    Cleared(ClearedStep),
    /// Columns collapsed and refilled; detection follows.
    Collapsed { cascade_index: u32, report: CollapseReport },
    /// No runs remain (or the depth limit was hit).
    Settled(SettledStep),
}

/// A resolution loop in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    state: ResolutionState,
    swap: Option<SwapContext>,
    cascade_index: u32,
    max_depth: u32,
    summary: SettledStep,
}

impl Cascade {
    /// Start a loop at cascade index 0.
    ///
    /// `swap` is the player's swap, if the loop follows one; its origin tags
    /// the first event batch and its destination may host a power-up.
    #[must_use]
    pub fn new(swap: Option<SwapContext>, max_depth: u32) -> Self {
        Self::starting_at(swap, 0, max_depth)
    }

    /// Start a loop at an arbitrary cascade index (e.g. 1 after a combo refill).
    #[must_use]
    pub fn starting_at(swap: Option<SwapContext>, cascade_index: u32, max_depth: u32) -> Self {
        Self {
            state: ResolutionState::Detecting,
            swap,
            cascade_index,
            max_depth: max_depth.max(1),
            summary: SettledStep::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Index the next clear phase will carry.
    #[must_use]
    pub fn cascade_index(&self) -> u32 {
        self.cascade_index
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state == ResolutionState::Idle
    }

    /// Run the next phase against `board`.
    pub fn step<R: RandomSource>(&mut self, board: &mut Board, env: &mut CascadeEnv<'_, R>) -> CascadeStep {
        match self.state {
            ResolutionState::Idle => CascadeStep::Settled(self.summary),
            ResolutionState::Detecting => self.detect_and_clear(board, env),
            ResolutionState::Resolving => {
                let report = collapse_columns(board, env.alphabet, env.rng);
                let cascade_index = self.cascade_index;
                self.cascade_index += 1;
                self.state = ResolutionState::Detecting;
                CascadeStep::Collapsed { cascade_index, report }
            }
        }
    }

    fn detect_and_clear<R: RandomSource>(&mut self, board: &mut Board, env: &mut CascadeEnv<'_, R>) -> CascadeStep {
        let mut scan = find_matches(board);
        if scan.is_empty() || self.summary.cascades >= self.max_depth {
            self.summary.truncated = !scan.is_empty();
            self.state = ResolutionState::Idle;
            return CascadeStep::Settled(self.summary);
        }

        let destination = self.swap.map(|s| s.destination);
        let origin = self.swap.map(|s| s.origin);
        let spawns = plan_power_ups(&scan.runs, destination, self.cascade_index);
        let events = build_match_events(&scan.runs, &spawns, origin, self.cascade_index, env.counter);
        apply_power_ups(board, &spawns, &mut scan.cleared);

        let cleared = scan.sorted_cells();
        let points = score_matches(board, &cleared, env.letter_values);
        let removed = board.clear_cells(&cleared).into_iter().map(|tile| tile.id).collect();

        self.summary.matched = true;
        self.summary.cascades += 1;
        self.summary.points = self.summary.points.saturating_add(points);
        self.state = ResolutionState::Resolving;

        CascadeStep::Cleared(ClearedStep {
            cascade_index: self.cascade_index,
            events,
            spawns,
            cleared,
            removed,
            points,
        })
    }
}

/// Drive a cascade to completion, returning every step including the final
/// `Settled`.
pub fn resolve_board<R: RandomSource>(
    board: &mut Board,
    env: &mut CascadeEnv<'_, R>,
    mut cascade: Cascade,
) -> Vec<CascadeStep> {
    let mut steps = Vec::new();
    loop {
        let step = cascade.step(board, env);
        let done = matches!(step, CascadeStep::Settled(_));
        steps.push(step);
        if done {
            return steps;
        }
    }
}

//! The caller layer: one game session around the engine.
//!
//! [`GameSession`] owns everything a running game needs: the board, the
//! refill and loot rng streams, the event id counter, reward state, score,
//! statistics and the caller's event subscribers. Each player swap goes
//! through a [`SwapDriver`], which yields one [`SwapStep`] per engine phase
//! so the presentation layer can pause between them.
//!
//! ## Swap Lifecycle
//!
//! 1. [`GameSession::begin_swap`] validates and commits the swap
//! 2. A swap moving a line clear fires the combo, collapses, then resolves
//!    from cascade index 1 with no swap context
//! 3. Otherwise the resolution loop starts at cascade index 0 with the swap
//!    as context
//! 4. Each clear phase feeds its event batch to the loot and micro reward
//!    pipelines, then to subscribers
//! 5. A swap that matched nothing and fired no combo is swapped back
//!
//! ## Example
//!
//! ```
//! use letter_cascade::core::{Cell, EngineConfig};
//! use letter_cascade::session::GameSession;
//!
//! let mut session = GameSession::new(EngineConfig::default().with_seed(7));
//! assert!(session.play_swap(Cell::new(0, 0), Cell::new(2, 2), 0).is_none());
//!
//! let outcome = session.play_swap(Cell::new(0, 0), Cell::new(0, 1), 0).unwrap();
//! assert_eq!(outcome.matched, !outcome.reverted);
//! ```

mod snapshot;
mod stats;

pub use snapshot::SessionSnapshot;
pub use stats::SessionStats;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::{collapse_columns, Board, BoardDefinition, CollapseReport};
use crate::core::{Cell, EngineConfig, GameRng};
use crate::matching::{activate_line_clear_combo, is_combo_swap, ComboOutcome};
use crate::resolve::{
    Cascade, CascadeEnv, CascadeStep, ClearedStep, EventBus, EventCounter, MatchEvent, MatchEventSubscriber,
    SettledStep, SubscriberId, SwapContext,
};
use crate::rewards::{
    apply_match4_loot_drops, apply_match5_bonus_loot, LootDrop, LootSession, MicroRewardFired, MicroRewardState,
};

/// Context name of the loot rng stream.
const LOOT_STREAM: &str = "loot";

/// Rewards earned by one event batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBatch {
    pub match4_loot: Vec<LootDrop>,
    pub match5_loot: Vec<LootDrop>,
    pub micro_reward: Option<MicroRewardFired>,
}

impl RewardBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.match4_loot.is_empty() && self.match5_loot.is_empty() && self.micro_reward.is_none()
    }

    /// All loot drops, match-4 first.
    pub fn drops(&self) -> impl Iterator<Item = &LootDrop> {
        self.match4_loot.iter().chain(&self.match5_loot)
    }
}

/// One phase of a swap, as reported to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapStep {
    /// A line-clear combo wiped its lines; a collapse follows.
    ComboCleared(ComboOutcome),
    /// Columns collapsed and refilled.
    Collapsed { cascade_index: u32, report: CollapseReport },
    /// A clear phase of the resolution loop, with the rewards it earned.
    Cleared { step: ClearedStep, rewards: RewardBatch },
    /// The swap is finished. No further steps follow.
    Settled {
        /// A run matched or a combo fired.
        matched: bool,
        /// The swap was undone.
        reverted: bool,
        summary: SettledStep,
    },
}

/// Everything a swap did, collected by [`GameSession::play_swap`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub matched: bool,
    pub reverted: bool,
    /// The resolution loop hit the depth limit.
    pub truncated: bool,
    /// Clear phases of the resolution loop (the combo is not counted).
    pub cascades: u32,
    /// Points earned, combo bonus included.
    pub points: u64,
    pub combo: Option<ComboOutcome>,
    pub events: Vec<MatchEvent>,
    pub loot: Vec<LootDrop>,
    pub micro_reward: Option<MicroRewardFired>,
    pub steps: Vec<SwapStep>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SwapPhase {
    Committed,
    ComboCollapse,
    Resolving(Cascade),
    Done,
}

/// Drives one swap through the engine, one phase per call.
///
/// The driver holds no borrows between steps; the session is passed back
/// in each time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapDriver {
    origin: Cell,
    destination: Cell,
    phase: SwapPhase,
    combo_fired: bool,
}

impl SwapDriver {
    /// Cell the swap started from.
    #[must_use]
    pub fn origin(&self) -> Cell {
        self.origin
    }

    #[must_use]
    pub fn destination(&self) -> Cell {
        self.destination
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == SwapPhase::Done
    }

    /// Run the next phase. Returns `None` once the swap has settled.
    pub fn step(&mut self, session: &mut GameSession, now_ms: u64) -> Option<SwapStep> {
        loop {
            match std::mem::replace(&mut self.phase, SwapPhase::Done) {
                SwapPhase::Done => return None,
                SwapPhase::Committed => {
                    if let Some(outcome) = self.try_combo(session) {
                        self.phase = SwapPhase::ComboCollapse;
                        return Some(SwapStep::ComboCleared(outcome));
                    }
                    let swap = SwapContext {
                        origin: self.origin,
                        destination: self.destination,
                    };
                    self.phase = SwapPhase::Resolving(Cascade::new(Some(swap), session.config.max_cascade_depth));
                }
                SwapPhase::ComboCollapse => {
                    let report = collapse_columns(&mut session.board, &session.config.alphabet, &mut session.rng);
                    self.phase = SwapPhase::Resolving(Cascade::starting_at(None, 1, session.config.max_cascade_depth));
                    return Some(SwapStep::Collapsed { cascade_index: 0, report });
                }
                SwapPhase::Resolving(mut cascade) => {
                    let step = session.step_cascade(&mut cascade, now_ms);
                    if let SwapStep::Settled { .. } = step {
                        return Some(self.finish(session, step));
                    }
                    self.phase = SwapPhase::Resolving(cascade);
                    return Some(step);
                }
            }
        }
    }

    fn try_combo(&mut self, session: &mut GameSession) -> Option<ComboOutcome> {
        if !is_combo_swap(&session.board, self.origin, self.destination) {
            return None;
        }
        let outcome = activate_line_clear_combo(
            &mut session.board,
            self.origin,
            self.destination,
            &session.config.letter_values,
            session.config.combo_bonus_multiplier,
        )?;

        self.combo_fired = true;
        session.score = session.score.saturating_add(outcome.total_points());
        session.stats.combos += 1;
        session.stats.tiles_cleared += outcome.removed.len() as u64;
        Some(outcome)
    }

    fn finish(&mut self, session: &mut GameSession, step: SwapStep) -> SwapStep {
        let SwapStep::Settled { summary, .. } = step else {
            return step;
        };

        let matched = summary.matched || self.combo_fired;
        let reverted = !matched && session.board.swap(self.origin, self.destination);
        if reverted {
            session.stats.swaps_reverted += 1;
        }
        session.stats.record_loop(summary.cascades, summary.truncated);

        SwapStep::Settled {
            matched,
            reverted,
            summary,
        }
    }
}

/// A running game.
pub struct GameSession {
    config: EngineConfig,
    board: Board,
    rng: GameRng,
    loot_rng: GameRng,
    counter: EventCounter,
    loot: LootSession,
    micro_reward: MicroRewardState,
    score: u64,
    stats: SessionStats,
    history: Vector<MatchEvent>,
    subscribers: EventBus,
}

impl GameSession {
    /// Start a session: build the mask and fill the board without runs.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let board = Board::fill_grid_no_matches(&config.board.mask, &config.alphabet, &mut rng);
        Self::start(config, board, rng)
    }

    /// Start a session on a prepared board, e.g. a hand-authored level.
    ///
    /// The board is used as is; any run already on it resolves on the first
    /// swap. Its mask replaces the configured board definition, so
    /// [`reset`](Self::reset) refills the same shape.
    #[must_use]
    pub fn with_board(mut config: EngineConfig, board: Board) -> Self {
        config.board = BoardDefinition {
            rows: board.rows(),
            cols: board.cols(),
            mask: board.mask().clone(),
        };
        let rng = GameRng::new(config.seed);
        Self::start(config, board, rng)
    }

    fn start(config: EngineConfig, board: Board, rng: GameRng) -> Self {
        let loot_rng = rng.for_context(LOOT_STREAM);
        Self {
            config,
            board,
            rng,
            loot_rng,
            counter: EventCounter::new(),
            loot: LootSession::new(),
            micro_reward: MicroRewardState::new(),
            score: 0,
            stats: SessionStats::new(),
            history: Vector::new(),
            subscribers: EventBus::new(),
        }
    }

    /// Continue a session from a snapshot. Subscribers start empty.
    #[must_use]
    pub fn restore(config: EngineConfig, snapshot: SessionSnapshot) -> Self {
        Self {
            config,
            board: snapshot.board,
            rng: GameRng::from_state(&snapshot.rng),
            loot_rng: GameRng::from_state(&snapshot.loot_rng),
            counter: snapshot.counter,
            loot: snapshot.loot,
            micro_reward: snapshot.micro_reward,
            score: snapshot.score,
            stats: snapshot.stats,
            history: snapshot.history,
            subscribers: EventBus::new(),
        }
    }

    /// Capture the session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            rng: self.rng.state(),
            loot_rng: self.loot_rng.state(),
            counter: self.counter,
            loot: self.loot.clone(),
            micro_reward: self.micro_reward,
            score: self.score,
            stats: self.stats.clone(),
            history: self.history.clone(),
        }
    }

    /// Start over with a new seed. Subscribers are kept.
    pub fn reset(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = GameRng::new(seed);
        self.loot_rng = self.rng.for_context(LOOT_STREAM);
        self.board = Board::fill_grid_no_matches(&self.config.board.mask, &self.config.alphabet, &mut self.rng);
        self.counter = EventCounter::new();
        self.loot.reset();
        self.micro_reward.reset();
        self.score = 0;
        self.stats.reset();
        self.history.clear();
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn loot(&self) -> &LootSession {
        &self.loot
    }

    #[must_use]
    pub fn micro_reward(&self) -> &MicroRewardState {
        &self.micro_reward
    }

    /// Every match event of the session, in emission order.
    #[must_use]
    pub fn history(&self) -> &Vector<MatchEvent> {
        &self.history
    }

    /// Id the next match event will receive.
    #[must_use]
    pub fn next_event_id(&self) -> u64 {
        self.counter.peek()
    }

    /// Register a subscriber for every event batch.
    pub fn subscribe(&mut self, subscriber: impl MatchEventSubscriber + 'static) -> SubscriberId {
        self.subscribers.subscribe(Box::new(subscriber))
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Commit a swap between two adjacent occupied cells.
    ///
    /// `origin` is the tile the player dragged, `destination` where it lands.
    /// Returns `None` and leaves the board untouched for an illegal swap.
    pub fn begin_swap(&mut self, origin: Cell, destination: Cell) -> Option<SwapDriver> {
        if !self.board.is_adjacent(origin, destination) || !self.board.swap(origin, destination) {
            return None;
        }
        self.stats.swaps_attempted += 1;
        Some(SwapDriver {
            origin,
            destination,
            phase: SwapPhase::Committed,
            combo_fired: false,
        })
    }

    /// Play a swap to completion without pausing between phases.
    pub fn play_swap(&mut self, origin: Cell, destination: Cell, now_ms: u64) -> Option<SwapOutcome> {
        let mut driver = self.begin_swap(origin, destination)?;
        let mut outcome = SwapOutcome::default();

        while let Some(step) = driver.step(self, now_ms) {
            match &step {
                SwapStep::ComboCleared(combo) => {
                    outcome.points = outcome.points.saturating_add(combo.total_points());
                    outcome.combo = Some(combo.clone());
                }
                SwapStep::Collapsed { .. } => {}
                SwapStep::Cleared { step, rewards } => {
                    outcome.points = outcome.points.saturating_add(step.points);
                    outcome.events.extend(step.events.iter().cloned());
                    outcome.loot.extend(rewards.drops().cloned());
                    outcome.micro_reward = outcome.micro_reward.or(rewards.micro_reward);
                }
                SwapStep::Settled {
                    matched,
                    reverted,
                    summary,
                } => {
                    outcome.matched = *matched;
                    outcome.reverted = *reverted;
                    outcome.truncated = summary.truncated;
                    outcome.cascades = summary.cascades;
                }
            }
            outcome.steps.push(step);
        }

        Some(outcome)
    }

    fn step_cascade(&mut self, cascade: &mut Cascade, now_ms: u64) -> SwapStep {
        let mut env = CascadeEnv::new(
            &self.config.alphabet,
            &self.config.letter_values,
            &mut self.rng,
            &mut self.counter,
        );
        match cascade.step(&mut self.board, &mut env) {
            CascadeStep::Cleared(step) => {
                let rewards = self.dispatch(&step, now_ms);
                SwapStep::Cleared { step, rewards }
            }
            CascadeStep::Collapsed { cascade_index, report } => SwapStep::Collapsed { cascade_index, report },
            CascadeStep::Settled(summary) => SwapStep::Settled {
                matched: summary.matched,
                reverted: false,
                summary,
            },
        }
    }

    /// Score a clear phase and run its events through the reward pipelines,
    /// then the subscribers.
    fn dispatch(&mut self, step: &ClearedStep, now_ms: u64) -> RewardBatch {
        self.score = self.score.saturating_add(step.points);
        self.stats.cascades += 1;
        self.stats.tiles_cleared += step.removed.len() as u64;
        self.stats.power_ups_spawned += step.spawns.len() as u32;

        let events = &step.events;
        let match4_loot = apply_match4_loot_drops(
            events,
            self.config.match4_loot.as_ref(),
            &mut self.loot,
            &mut self.loot_rng,
        );
        let match5_loot = apply_match5_bonus_loot(
            events,
            self.config.match5_loot.as_ref(),
            &mut self.loot,
            &mut self.loot_rng,
        );
        let micro_reward = self
            .config
            .first_match5_reward
            .and_then(|reward| self.micro_reward.observe(events, &reward, now_ms));

        self.stats.loot_drops += (match4_loot.len() + match5_loot.len()) as u32;
        if micro_reward.is_some() {
            self.stats.rewards_fired += 1;
        }

        self.history.extend(events.iter().cloned());
        self.subscribers.publish(events);

        RewardBatch {
            match4_loot,
            match5_loot,
            micro_reward,
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("board", &self.board.to_rows())
            .field("score", &self.score)
            .field("next_event_id", &self.counter.peek())
            .field("stats", &self.stats)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

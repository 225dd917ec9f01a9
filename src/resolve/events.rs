//! Match events and their subscribers.
//!
//! One [`MatchEvent`] is built per run per cascade step. Event ids come from
//! an [`EventCounter`] owned by the session and threaded through every pass,
//! so ids are unique and increasing for the whole session.
//!
//! The engine never calls subscribers itself. Whoever drives the cascade
//! publishes each batch to an [`EventBus`] it owns.

use serde::{Deserialize, Serialize};

use crate::board::Letter;
use crate::core::{Cell, Orientation};
use crate::matching::{MatchRun, PowerUpSpawn};

/// Monotonic event id source. Reset only at session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounter {
    next: u64,
}

impl Default for EventCounter {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EventCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A counter whose next id is `start`.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// The id the next event will receive.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    /// Take the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A run observed during one cascade step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: u64,
    /// Full run length, including a power-up host cell.
    pub length: usize,
    pub orientation: Orientation,
    pub letter: Letter,
    /// Origin of the player's swap, on cascade index 0 only.
    pub swap_origin: Option<Cell>,
    pub cascade_index: u32,
    /// Cells actually cleared: the run minus any power-up host cell.
    pub cells: Vec<Cell>,
}

/// Build the event batch for one detection pass.
///
/// Runs are taken in detection order; cells chosen to host a power-up in
/// this pass are left out of every event's cell list.
pub fn build_match_events(
    runs: &[MatchRun],
    spawns: &[PowerUpSpawn],
    swap_origin: Option<Cell>,
    cascade_index: u32,
    counter: &mut EventCounter,
) -> Vec<MatchEvent> {
    let origin = swap_origin.filter(|_| cascade_index == 0);

    runs.iter()
        .map(|run| MatchEvent {
            id: counter.allocate(),
            length: run.length,
            orientation: run.orientation,
            letter: run.letter,
            swap_origin: origin,
            cascade_index,
            cells: run
                .cells
                .iter()
                .copied()
                .filter(|cell| !spawns.iter().any(|s| s.cell == *cell))
                .collect(),
        })
        .collect()
}

/// Receives every event batch a session emits.
pub trait MatchEventSubscriber {
    fn on_match_events(&mut self, batch: &[MatchEvent]);
}

impl<F> MatchEventSubscriber for F
where
    F: FnMut(&[MatchEvent]),
{
    fn on_match_events(&mut self, batch: &[MatchEvent]) {
        self(batch);
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u32);

/// Registry of externally owned event subscribers.
///
/// Subscribers are called in registration order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Box<dyn MatchEventSubscriber>)>,
    next_id: u32,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    pub fn subscribe(&mut self, subscriber: Box<dyn MatchEventSubscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver a batch to every subscriber. Empty batches are dropped.
    pub fn publish(&mut self, batch: &[MatchEvent]) {
        if batch.is_empty() {
            return;
        }
        for (_, subscriber) in &mut self.subscribers {
            subscriber.on_match_events(batch);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::matching::{find_matches, plan_power_ups};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_build_match_events() {
        let board = Board::from_rows(&["AAA", "BCD", "BCD"]);
        let scan = find_matches(&board);
        let mut counter = EventCounter::starting_at(10);

        let events = build_match_events(&scan.runs, &[], Some(Cell::new(1, 1)), 0, &mut counter);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].orientation, Orientation::Horizontal);
        assert_eq!(events[0].length, 3);
        assert_eq!(events[0].swap_origin, Some(Cell::new(1, 1)));
        assert_eq!(events[0].cascade_index, 0);
        assert_eq!(events[0].id, 10);
        assert_eq!(counter.peek(), 11);
    }

    #[test]
    fn test_swap_origin_only_on_first_pass() {
        let board = Board::from_rows(&["ACD", "BCE", "FCG"]);
        let scan = find_matches(&board);
        let mut counter = EventCounter::new();

        let events = build_match_events(&scan.runs, &[], Some(Cell::new(0, 0)), 2, &mut counter);

        assert_eq!(events[0].orientation, Orientation::Vertical);
        assert_eq!(events[0].swap_origin, None);
        assert_eq!(events[0].cascade_index, 2);
        assert_eq!(events[0].id, 1);
    }

    #[test]
    fn test_event_cells_exclude_power_up_host() {
        let board = Board::from_rows(&["AAAA"]);
        let scan = find_matches(&board);
        let spawns = plan_power_ups(&scan.runs, None, 0);
        let events = build_match_events(&scan.runs, &spawns, None, 0, &mut EventCounter::new());

        assert_eq!(events[0].length, 4);
        assert_eq!(events[0].cells, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 3)]);
    }

    #[test]
    fn test_ids_continue_across_batches() {
        let board = Board::from_rows(&["AAA", "BBB"]);
        let scan = find_matches(&board);
        let mut counter = EventCounter::new();

        let first = build_match_events(&scan.runs, &[], None, 0, &mut counter);
        let second = build_match_events(&scan.runs, &[], None, 1, &mut counter);

        let ids: Vec<u64> = first.iter().chain(&second).map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_event_bus_publish_and_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let sink = Rc::clone(&seen);
        let id = bus.subscribe(Box::new(move |batch: &[MatchEvent]| {
            sink.borrow_mut().push(batch.len());
        }));
        assert_eq!(bus.len(), 1);

        let board = Board::from_rows(&["AAA"]);
        let events = build_match_events(&find_matches(&board).runs, &[], None, 0, &mut EventCounter::new());
        bus.publish(&events);
        bus.publish(&[]);
        assert_eq!(*seen.borrow(), vec![1]);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&events);
        assert_eq!(seen.borrow().len(), 1);
        assert!(bus.is_empty());
    }
}

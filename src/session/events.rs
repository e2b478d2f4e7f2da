//! Session events and their subscriber lists.
//!
//! A session publishes three kinds of events:
//!
//! - `TurnChanged`: a half-move resolved and the turn passes to the other
//!   participant. Not fired for the skip that ends the game.
//! - `Tick`: one second of move time elapsed.
//! - `Ended`: the session reached its terminal state.
//!
//! Handlers run synchronously, in registration order, while the session is
//! being mutated. They receive the event by reference and cannot call back
//! into the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Participant;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A half-move resolved and the turn changed hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnChanged {
    /// Half-move number that just resolved (starts at 1).
    pub turn: u32,
    /// Participant who made the half-move.
    pub mover: Participant,
    /// Whether the half-move was a skip.
    pub skipped: bool,
}

/// One tick of the move timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Seconds elapsed in the current half-move.
    pub elapsed: u32,
    /// Seconds left before the move is skipped automatically.
    pub remaining: u32,
}

/// The session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ended {
    /// When the session ended.
    pub at: DateTime<Utc>,
    /// Number of recorded half-moves.
    pub moves: u32,
}

type Handler<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered list of handlers for one event kind.
pub struct Subscribers<E> {
    handlers: SmallVec<[(SubscriptionId, Handler<E>); 4]>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            handlers: SmallVec::new(),
        }
    }
}

impl<E> Subscribers<E> {
    fn push(&mut self, id: SubscriptionId, handler: Handler<E>) {
        self.handlers.push((id, handler));
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// All subscriber lists of one session.
#[derive(Default)]
pub struct EventBus {
    next_id: u32,
    turn_changed: Subscribers<TurnChanged>,
    tick: Subscribers<Tick>,
    ended: Subscribers<Ended>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a turn-changed handler.
    pub fn on_turn_changed(
        &mut self,
        handler: impl FnMut(&TurnChanged) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.allocate();
        self.turn_changed.push(id, Box::new(handler));
        id
    }

    /// Register a tick handler.
    pub fn on_tick(&mut self, handler: impl FnMut(&Tick) + Send + 'static) -> SubscriptionId {
        let id = self.allocate();
        self.tick.push(id, Box::new(handler));
        id
    }

    /// Register an ended handler.
    pub fn on_ended(&mut self, handler: impl FnMut(&Ended) + Send + 'static) -> SubscriptionId {
        let id = self.allocate();
        self.ended.push(id, Box::new(handler));
        id
    }

    /// Remove a handler of any kind. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.turn_changed.remove(id) || self.tick.remove(id) || self.ended.remove(id)
    }

    /// Total number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.turn_changed.len() + self.tick.len() + self.ended.len()
    }

    pub(crate) fn emit_turn_changed(&mut self, event: &TurnChanged) {
        self.turn_changed.emit(event);
    }

    pub(crate) fn emit_tick(&mut self, event: &Tick) {
        self.tick.emit(event);
    }

    pub(crate) fn emit_ended(&mut self, event: &Ended) {
        self.ended.emit(event);
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("turn_changed", &self.turn_changed.len())
            .field("tick", &self.tick.len())
            .field("ended", &self.ended.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn turn(n: u32) -> TurnChanged {
        TurnChanged {
            turn: n,
            mover: Participant::Creator,
            skipped: false,
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            bus.on_turn_changed(move |e| log.lock().unwrap().push((name, e.turn)));
        }

        bus.emit_turn_changed(&turn(7));

        assert_eq!(
            *log.lock().unwrap(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::new();

        let c = Arc::clone(&count);
        let id = bus.on_tick(move |_| *c.lock().unwrap() += 1);
        bus.emit_tick(&Tick { elapsed: 1, remaining: 59 });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit_tick(&Tick { elapsed: 2, remaining: 58 });

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_ids_unique_across_kinds() {
        let mut bus = EventBus::new();
        let a = bus.on_turn_changed(|_| {});
        let b = bus.on_tick(|_| {});
        let c = bus.on_ended(|_| {});

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(bus.handler_count(), 3);

        assert!(bus.unsubscribe(c));
        assert_eq!(bus.handler_count(), 2);
    }
}

//! The session state machine.
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──start()──▶ Running ──skip limit reached / end()──▶ Ended
//! ```
//!
//! Transitions happen once and never reverse. Configuration setters only
//! take effect in `Created`; in any other state they are silently ignored.
//! Turn operations (`try_make_move`, `skip_move`, `rotate_active_rectangle`,
//! `tick`) are silent no-ops outside `Running`. Callers rely on both.
//!
//! ## Half-moves
//!
//! The creator moves first and the turn strictly alternates. A half-move
//! resolves either by placing the active rectangle or by skipping. Each
//! resolution appends one `Move`, fires `TurnChanged`, passes the turn,
//! rolls a new active size at the same anchor and resets the move timer.
//! The skip that reaches the skip limit is recorded and ends the session
//! instead; it does not fire `TurnChanged`.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, trace};

use super::events::{Ended, EventBus, SubscriptionId, Tick, TurnChanged};
use super::input::CellMapper;
use crate::core::{Dice, Move, Participant, PerPlayer, Rect};
use crate::error::{Error, Result};
use crate::map::{MapModel, TerritoryView};
use crate::replay::Replay;
use crate::rules::{GameMode, Rule};

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Configurable, not yet started.
    #[default]
    Created,
    /// Accepting moves.
    Running,
    /// Terminal.
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Created => write!(f, "Created"),
            SessionState::Running => write!(f, "Running"),
            SessionState::Ended => write!(f, "Ended"),
        }
    }
}

/// A two-participant game.
///
/// Built with [`SessionBuilder`](super::SessionBuilder). The session owns its
/// map, dice, move list and subscribers; nothing is shared with other
/// sessions.
pub struct GameSession {
    // === Identity ===
    id: String,
    state: SessionState,

    // === Configuration ===
    rule: Rule,

    // === Board ===
    map: MapModel,
    dice: Dice,
    active: Rect,

    // === Turn State ===
    turn: Participant,
    /// Half-move in progress (0 before start).
    turn_number: u32,
    skip_counter: u32,
    total_skipped: u32,
    /// Seconds elapsed in the current half-move.
    elapsed: u32,

    // === History ===
    moves: Vector<Move>,
    ended_at: Option<DateTime<Utc>>,

    events: EventBus,
}

impl GameSession {
    pub(crate) fn assemble(id: String, rule: Rule, map: MapModel, mut dice: Dice) -> Self {
        let active = Rect::at(0, 0, dice.roll());
        info!(session_id = %id, map = %map.extent(), "Creating new game session");
        Self {
            id,
            state: SessionState::Created,
            rule,
            map,
            dice,
            active,
            turn: Participant::Creator,
            turn_number: 0,
            skip_counter: 0,
            total_skipped: 0,
            elapsed: 0,
            moves: Vector::new(),
            ended_at: None,
            events: EventBus::new(),
        }
    }

    // === Accessors ===

    /// Session id, `"<uuid>-<n>"`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session accepts moves.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    /// Current ruleset.
    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.rule.mode()
    }

    /// Counted skips that end the game.
    #[must_use]
    pub fn skip_limit(&self) -> u32 {
        self.rule.skip_limit()
    }

    /// Seconds per half-move.
    #[must_use]
    pub fn move_duration(&self) -> u32 {
        self.rule.move_duration()
    }

    /// Whether the active rectangle may be rotated.
    #[must_use]
    pub fn rotation_allowed(&self) -> bool {
        self.rule.rotation_allowed()
    }

    /// The board.
    #[must_use]
    pub fn map(&self) -> &MapModel {
        &self.map
    }

    /// The pending rectangle the current participant may place.
    #[must_use]
    pub fn active_rect(&self) -> Rect {
        self.active
    }

    /// Whose turn it is.
    #[must_use]
    pub fn turn(&self) -> Participant {
        self.turn
    }

    /// Half-move in progress, starting at 1. Zero before start.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Mode-dependent skip counter.
    #[must_use]
    pub fn skip_counter(&self) -> u32 {
        self.skip_counter
    }

    /// All skips in this session.
    #[must_use]
    pub fn total_skipped(&self) -> u32 {
        self.total_skipped
    }

    /// Seconds elapsed in the current half-move.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Claimed cells per participant.
    #[must_use]
    pub fn areas(&self) -> PerPlayer<u32> {
        self.map.areas()
    }

    /// Recorded half-moves, in order.
    #[must_use]
    pub fn moves(&self) -> &Vector<Move> {
        &self.moves
    }

    /// When the session ended.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    // === Configuration ===

    /// Set the game mode. Ignored unless `Created`.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.reconfigure(|r| {
            Rule::new(mode, r.skip_limit(), r.move_duration(), r.rotation_allowed())
        });
    }

    /// Set the skip limit. Ignored unless `Created` or when zero.
    pub fn set_skip_limit(&mut self, limit: u32) {
        self.reconfigure(|r| Rule::new(r.mode(), limit, r.move_duration(), r.rotation_allowed()));
    }

    /// Set the move duration in seconds. Ignored unless `Created` or when zero.
    pub fn set_move_duration(&mut self, seconds: u32) {
        self.reconfigure(|r| Rule::new(r.mode(), r.skip_limit(), seconds, r.rotation_allowed()));
    }

    /// Allow or forbid rotation. Ignored unless `Created`.
    pub fn set_rotation_allowed(&mut self, allowed: bool) {
        self.reconfigure(|r| Rule::new(r.mode(), r.skip_limit(), r.move_duration(), allowed));
    }

    fn reconfigure(&mut self, f: impl FnOnce(&Rule) -> Result<Rule>) {
        if self.state != SessionState::Created {
            trace!(session_id = %self.id, state = %self.state, "configuration ignored");
            return;
        }
        if let Ok(rule) = f(&self.rule) {
            self.rule = rule;
        }
    }

    // === Subscriptions ===

    /// Register a turn-changed handler.
    pub fn on_turn_changed(
        &mut self,
        handler: impl FnMut(&TurnChanged) + Send + 'static,
    ) -> SubscriptionId {
        self.events.on_turn_changed(handler)
    }

    /// Register a tick handler.
    pub fn on_tick(&mut self, handler: impl FnMut(&Tick) + Send + 'static) -> SubscriptionId {
        self.events.on_tick(handler)
    }

    /// Register an ended handler.
    pub fn on_ended(&mut self, handler: impl FnMut(&Ended) + Send + 'static) -> SubscriptionId {
        self.events.on_ended(handler)
    }

    /// Remove a handler. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // === Lifecycle ===

    /// Start the session. Returns false unless `Created`.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Created {
            return false;
        }
        self.state = SessionState::Running;
        self.turn = Participant::Creator;
        self.turn_number = 1;
        self.elapsed = 0;
        info!(rule = ?self.rule, "Session started");
        true
    }

    /// End the session. No-op unless `Running`.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn end(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.state = SessionState::Ended;
        let at = Utc::now();
        self.ended_at = Some(at);
        info!(
            moves = self.moves.len(),
            creator = self.map.areas()[Participant::Creator],
            client = self.map.areas()[Participant::Client],
            "Session ended"
        );
        self.events.emit_ended(&Ended {
            at,
            moves: self.moves.len() as u32,
        });
    }

    // === Turn Operations ===

    /// Move the active rectangle's anchor to a cell. No-op once ended.
    pub fn move_active_to(&mut self, x: i32, y: i32) {
        if self.state == SessionState::Ended {
            return;
        }
        self.active = self.active.with_position(x, y);
    }

    /// Move the active rectangle to the cell under a pixel.
    pub fn move_active_to_pixel(&mut self, mapper: &CellMapper, px: i32, py: i32) {
        let (x, y) = mapper.to_cell(px, py);
        self.move_active_to(x, y);
    }

    /// Swap the active rectangle's width and height.
    ///
    /// No-op unless `Running` with rotation allowed.
    pub fn rotate_active_rectangle(&mut self) {
        if self.state != SessionState::Running || !self.rule.rotation_allowed() {
            return;
        }
        self.active = self.active.rotated();
    }

    /// Try to place the active rectangle for the current participant.
    ///
    /// Returns false with no side effects unless `Running` and the
    /// placement is legal. The active rectangle stays pending on failure.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn try_make_move(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }

        let player = self.turn;
        let rect = self.active;
        if !self.map.try_add_rectangle(player, rect) {
            debug!(%player, %rect, "Placement rejected");
            return false;
        }

        self.skip_counter = self.rule.mode().after_placement(self.skip_counter);
        debug!(%player, %rect, area = self.map.areas()[player], "Placement accepted");
        self.resolve_half_move(rect, false);
        true
    }

    /// Skip the current participant's half-move. No-op unless `Running`.
    ///
    /// Ends the session when the skip counter reaches the skip limit.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn skip_move(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.total_skipped += 1;
        self.skip_counter += 1;
        debug!(
            player = %self.turn,
            counter = self.skip_counter,
            limit = self.rule.skip_limit(),
            "Skip counted"
        );

        if self.skip_counter >= self.rule.skip_limit() {
            let record = self.record(Rect::EMPTY, true);
            self.moves.push_back(record);
            self.end();
            return;
        }

        self.resolve_half_move(Rect::EMPTY, true);
    }

    /// Advance the move timer by one second.
    ///
    /// Skips the current half-move once the elapsed time reaches the move
    /// duration. No-op unless `Running`.
    #[instrument(level = "trace", skip(self), fields(session_id = %self.id))]
    pub fn tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.elapsed += 1;
        let duration = self.rule.move_duration();
        self.events.emit_tick(&Tick {
            elapsed: self.elapsed,
            remaining: duration.saturating_sub(self.elapsed),
        });

        if self.elapsed >= duration {
            info!(player = %self.turn, elapsed = self.elapsed, "Move time expired");
            self.skip_move();
        }
    }

    /// Freeze this session into a replay.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the session has ended.
    pub fn create_replay(&self) -> Result<Replay> {
        if self.state != SessionState::Ended {
            return Err(Error::InvalidState("replay requires an ended session"));
        }
        Ok(Replay::from_session(self))
    }

    fn record(&self, rect: Rect, skipped: bool) -> Move {
        let areas = self.map.areas();
        let (creator, client) = (areas[Participant::Creator], areas[Participant::Client]);
        let (index, player, time) = (self.turn_number, self.turn, self.elapsed);
        if skipped {
            Move::skipped(index, player, time, self.skip_counter, creator, client)
        } else {
            Move::placed(index, player, time, rect, self.skip_counter, creator, client)
        }
    }

    fn resolve_half_move(&mut self, rect: Rect, skipped: bool) {
        let record = self.record(rect, skipped);
        self.moves.push_back(record);

        self.events.emit_turn_changed(&TurnChanged {
            turn: self.turn_number,
            mover: self.turn,
            skipped,
        });

        self.turn = self.turn.opponent();
        self.active = self.active.with_extent(self.dice.roll());
        self.turn_number += 1;
        self.elapsed = 0;
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("rule", &self.rule)
            .field("turn", &self.turn)
            .field("turn_number", &self.turn_number)
            .field("skip_counter", &self.skip_counter)
            .field("moves", &self.moves.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Extent;
    use crate::session::{SessionBuilder, SessionIdCounter};
    use std::sync::Arc;

    fn session() -> GameSession {
        SessionBuilder::new()
            .seed(11)
            .start_sizes(Extent::new(5, 5), Extent::new(3, 4))
            .id_counter(Arc::new(SessionIdCounter::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_session_state() {
        let s = session();
        assert_eq!(s.state(), SessionState::Created);
        assert_eq!(s.turn_number(), 0);
        assert!(s.moves().is_empty());
        assert!(s.id().ends_with("-1"));
        assert_eq!(s.rule(), Rule::default());
    }

    #[test]
    fn test_start_once() {
        let mut s = session();
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.turn(), Participant::Creator);
        assert_eq!(s.turn_number(), 1);
    }

    #[test]
    fn test_turn_ops_ignored_before_start() {
        let mut s = session();
        s.move_active_to(15, 12);

        assert!(!s.try_make_move());
        s.skip_move();
        s.tick();

        assert_eq!(s.total_skipped(), 0);
        assert_eq!(s.elapsed(), 0);
        assert!(s.moves().is_empty());
    }

    #[test]
    fn test_rotation_requires_permission() {
        let mut s = session();
        s.start();
        let before = s.active_rect();
        s.rotate_active_rectangle();
        assert_eq!(s.active_rect(), before);

        let mut s = session();
        s.set_rotation_allowed(true);
        s.start();
        let before = s.active_rect();
        s.rotate_active_rectangle();
        assert_eq!(s.active_rect(), before.rotated());
    }

    #[test]
    fn test_skip_advances_turn() {
        let mut s = session();
        s.start();
        s.skip_move();

        assert_eq!(s.turn(), Participant::Client);
        assert_eq!(s.turn_number(), 2);
        assert_eq!(s.skip_counter(), 1);

        let record = s.moves()[0];
        assert!(record.skipped);
        assert_eq!(record.rect, Rect::EMPTY);
        assert_eq!(record.player, Some(Participant::Creator));
        assert_eq!(record.index, 1);
    }

    #[test]
    fn test_end_is_terminal() {
        let mut s = session();
        s.start();
        s.end();

        assert!(s.is_ended());
        assert!(s.ended_at().is_some());
        assert!(!s.start());
        s.skip_move();
        assert!(s.moves().is_empty());
    }

    #[test]
    fn test_replay_requires_end() {
        let mut s = session();
        assert!(s.create_replay().unwrap_err().is_invalid_state());
        s.start();
        assert!(s.create_replay().unwrap_err().is_invalid_state());
        s.end();
        assert!(s.create_replay().is_ok());
    }
}

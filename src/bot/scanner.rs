//! The scanning bot and its driver thread.
//!
//! `ScanningBot` tries every anchor cell starting from the far corner of the
//! map (`x = width..=0`, then `y = height..=0`) and places the active
//! rectangle at the first legal spot. If nothing fits it skips. It only uses
//! the session's public API.
//!
//! `BotHandle` runs a policy on its own thread against a shared session.
//! Think time is slept outside the session lock; the turn is re-checked
//! under the lock before acting, so a timer auto-skip that lands while the
//! bot is thinking is never answered with a stale move.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

use crate::core::{BotConfig, Participant, Rect};
use crate::map::TerritoryView;
use crate::session::{lock, GameSession, SharedSession};

// =============================================================================
// Policy
// =============================================================================

/// What a policy did with its half-move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotAction {
    /// Placed the active rectangle here.
    Placed(Rect),
    /// Skipped the half-move.
    Skipped,
    /// Not this policy's turn, or the session is not running.
    Idle,
}

/// Decides one half-move for a participant.
pub trait MovePolicy: Send {
    /// The participant this policy plays.
    fn role(&self) -> Participant;

    /// Play the current half-move if it belongs to [`role`](Self::role).
    fn play_turn(&mut self, session: &mut GameSession) -> BotAction;
}

/// Places at the first legal anchor found scanning from the far corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanningBot {
    role: Participant,
}

impl ScanningBot {
    /// Bot playing `role`.
    #[must_use]
    pub fn new(role: Participant) -> Self {
        Self { role }
    }

    fn find_anchor(&self, session: &GameSession) -> Option<(i32, i32)> {
        let map = session.map();
        let active = session.active_rect();
        let extent = map.extent();

        (0..=extent.width).rev().find_map(|x| {
            (0..=extent.height)
                .rev()
                .find(|&y| map.can_place(self.role, active.with_position(x, y)))
                .map(|y| (x, y))
        })
    }
}

impl MovePolicy for ScanningBot {
    fn role(&self) -> Participant {
        self.role
    }

    fn play_turn(&mut self, session: &mut GameSession) -> BotAction {
        if !session.is_running() || session.turn() != self.role {
            return BotAction::Idle;
        }

        if let Some((x, y)) = self.find_anchor(session) {
            session.move_active_to(x, y);
            let rect = session.active_rect();
            if session.try_make_move() {
                trace!(role = %self.role, %rect, "Bot placed");
                return BotAction::Placed(rect);
            }
        }

        debug!(
            role = %self.role,
            size = %session.active_rect().extent(),
            "Bot found no room, skipping"
        );
        session.skip_move();
        BotAction::Skipped
    }
}

// =============================================================================
// Driver thread
// =============================================================================

/// A policy running on its own thread against a shared session.
///
/// Dropping the handle disables the bot and joins its thread.
#[derive(Debug)]
pub struct BotHandle {
    role: Participant,
    enabled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl BotHandle {
    /// Start driving `session` with `policy`.
    ///
    /// The thread waits while the session is `Created` or it is the other
    /// participant's turn, and exits once the session ends or the handle is
    /// disabled.
    pub fn spawn<P>(mut policy: P, session: SharedSession, config: BotConfig) -> Self
    where
        P: MovePolicy + 'static,
    {
        let role = policy.role();
        let enabled = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&enabled);
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let handle = thread::spawn(move || {
            while flag.load(Ordering::Relaxed) {
                let (turn_number, window) = {
                    let guard = lock(&session);
                    if guard.is_ended() {
                        break;
                    }
                    if !guard.is_running() || guard.turn() != role {
                        drop(guard);
                        thread::sleep(config.poll_interval);
                        continue;
                    }
                    (guard.turn_number(), config.think_window(guard.move_duration()))
                };

                let think = think_time(&mut rng, window);
                if !nap(think, config.poll_interval, &flag) {
                    break;
                }

                let mut guard = lock(&session);
                // The timer may have skipped this half-move while thinking
                if guard.turn_number() != turn_number {
                    continue;
                }
                let action = policy.play_turn(&mut guard);
                trace!(%role, ?action, ?think, "Bot acted");
            }
            debug!(%role, "Bot stopped");
        });

        Self {
            role,
            enabled,
            handle: Some(handle),
        }
    }

    /// The participant this bot plays.
    #[must_use]
    pub fn role(&self) -> Participant {
        self.role
    }

    /// Whether the bot is still enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Whether the bot thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop acting. The thread exits at its next check.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Disable the bot and wait for its thread.
    pub fn join(&mut self) {
        self.disable();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub(crate) fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }
}

impl Drop for BotHandle {
    fn drop(&mut self) {
        self.join();
    }
}

/// Random duration in `[min, max)`, or `min` when the window is empty.
fn think_time(rng: &mut ChaCha8Rng, (min, max): (Duration, Duration)) -> Duration {
    if max <= min {
        return min;
    }
    let low = u64::try_from(min.as_micros()).unwrap_or(u64::MAX);
    let high = u64::try_from(max.as_micros()).unwrap_or(u64::MAX);
    Duration::from_micros(rng.gen_range(low..high))
}

/// Sleep for `total` in `step` slices. Returns false if disabled meanwhile.
fn nap(total: Duration, step: Duration, enabled: &AtomicBool) -> bool {
    let step = if step.is_zero() { total } else { step };
    let mut left = total;
    while !left.is_zero() {
        if !enabled.load(Ordering::Relaxed) {
            return false;
        }
        let slice = left.min(step);
        thread::sleep(slice);
        left -= slice;
    }
    enabled.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, Extent};
    use crate::session::{share, SessionBuilder, SessionIdCounter};
    use std::time::Instant;

    fn session(seed: u64) -> GameSession {
        SessionBuilder::new()
            .seed(seed)
            .skip_limit(2)
            .start_sizes(Extent::new(5, 5), Extent::new(3, 4))
            .id_counter(Arc::new(SessionIdCounter::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_scanner_places_from_far_corner() {
        let mut game = session(1);
        game.start();
        let mut bot = ScanningBot::new(Participant::Creator);

        let BotAction::Placed(rect) = bot.play_turn(&mut game) else {
            panic!("creator should find room next to its start");
        };
        assert_eq!(game.turn(), Participant::Client);
        assert_eq!(game.map().get(rect.x, rect.y), Some(Cell::Player1));
        assert_eq!(game.areas()[Participant::Creator], 25 + rect.area());
        assert_eq!(game.moves().len(), 1);
    }

    #[test]
    fn test_scanner_idle_out_of_turn() {
        let mut game = session(1);
        let mut bot = ScanningBot::new(Participant::Client);

        assert_eq!(bot.play_turn(&mut game), BotAction::Idle);
        game.start();
        assert_eq!(bot.play_turn(&mut game), BotAction::Idle);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_scanner_skips_when_nothing_fits() {
        // Start rectangles fill both halves of the 10x10 map
        let mut game = SessionBuilder::new()
            .seed(2)
            .map_size(10, 10)
            .start_sizes(Extent::new(10, 5), Extent::new(10, 5))
            .id_counter(Arc::new(SessionIdCounter::new()))
            .build()
            .unwrap();
        game.start();
        let mut bot = ScanningBot::new(Participant::Creator);

        assert_eq!(bot.play_turn(&mut game), BotAction::Skipped);
        assert_eq!(game.total_skipped(), 1);
    }

    #[test]
    fn test_think_time_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let window = (Duration::from_millis(2), Duration::from_millis(4));
        for _ in 0..50 {
            let t = think_time(&mut rng, window);
            assert!(t >= window.0 && t < window.1);
        }
        let flat = (Duration::from_millis(3), Duration::from_millis(3));
        assert_eq!(think_time(&mut rng, flat), Duration::from_millis(3));
    }

    #[test]
    fn test_handle_plays_its_turns() {
        let shared = share(session(4));
        let config = BotConfig::new()
            .with_think_time(Duration::from_millis(1), Duration::from_millis(2))
            .with_poll_interval(Duration::from_millis(1))
            .with_seed(9);
        let creator =
            BotHandle::spawn(ScanningBot::new(Participant::Creator), Arc::clone(&shared), config);
        let client =
            BotHandle::spawn(ScanningBot::new(Participant::Client), Arc::clone(&shared), config);

        lock(&shared).start();

        let deadline = Instant::now() + Duration::from_secs(10);
        while !lock(&shared).is_ended() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        let guard = lock(&shared);
        assert!(guard.is_ended());
        assert!(guard.moves().len() >= 2);
        drop(guard);

        drop(creator);
        drop(client);
    }

    #[test]
    fn test_disable_stops_thread() {
        let shared = share(session(6));
        let mut handle =
            BotHandle::spawn(ScanningBot::new(Participant::Client), shared, BotConfig::new());

        assert!(handle.is_enabled());
        handle.join();
        assert!(!handle.is_enabled());
        assert!(handle.is_finished());
    }
}

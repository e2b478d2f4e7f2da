//! Shared sessions and the move-timer thread.
//!
//! When a session is driven from more than one thread (a clock plus bots or
//! an input loop), every mutating call goes through one `Mutex`. That makes
//! an expiring-timer auto-skip and a concurrent placement attempt strictly
//! ordered: whichever takes the lock second sees the turn already resolved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

use super::game::GameSession;
use crate::core::ClockConfig;

/// A session shared between threads.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Wrap a session for sharing.
#[must_use]
pub fn share(session: GameSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Lock a shared session, recovering from poisoning.
///
/// A panicking event handler must not wedge every other driver of the
/// session, so the guard is taken back from a poisoned lock.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Background thread that ticks a shared session once per interval.
///
/// The clock waits while the session is `Created`, ticks while it is
/// `Running` and exits on its own once the session has ended.
#[derive(Debug)]
pub struct SessionClock {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SessionClock {
    /// Start ticking `session`.
    pub fn spawn(session: SharedSession, config: ClockConfig) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            loop {
                thread::sleep(config.interval);
                if flag.load(Ordering::Relaxed) {
                    break;
                }

                let mut guard = lock(&session);
                if guard.is_ended() {
                    debug!(session_id = %guard.id(), "Clock stopped, session ended");
                    break;
                }
                trace!(session_id = %guard.id(), "tick");
                guard.tick();
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Whether the clock thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the clock and wait for its thread.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

//! A self-playing session: two bots and a clock on one shared session.
//!
//! Used for background previews. The session is independent of any other
//! session in the process. When it ends, both bots are disabled from the
//! `Ended` handler and their threads wind down on their own.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use super::scanner::{BotHandle, ScanningBot};
use crate::core::{BotConfig, ClockConfig, Participant};
use crate::error::Result;
use crate::replay::Replay;
use crate::session::{lock, share, SessionBuilder, SessionClock, SharedSession};

/// Two scanning bots playing each other.
#[derive(Debug)]
pub struct AutoSession {
    session: SharedSession,
    bots: [BotHandle; 2],
    clock: SessionClock,
}

impl AutoSession {
    /// Build the session and spawn both bots and the clock.
    ///
    /// Nothing moves until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Propagates [`SessionBuilder::build`] failures.
    pub fn new(builder: SessionBuilder, clock: ClockConfig, bots: BotConfig) -> Result<Self> {
        let session = share(builder.build()?);

        let [creator_config, client_config] = bot_configs(bots, clock);
        let creator = BotHandle::spawn(
            ScanningBot::new(Participant::Creator),
            Arc::clone(&session),
            creator_config,
        );
        let client = BotHandle::spawn(
            ScanningBot::new(Participant::Client),
            Arc::clone(&session),
            client_config,
        );

        let flags = [creator.enabled_flag(), client.enabled_flag()];
        lock(&session).on_ended(move |ended| {
            for flag in &flags {
                flag.store(false, Ordering::Relaxed);
            }
            info!(moves = ended.moves, "Auto session finished, bots disabled");
        });

        let clock = SessionClock::spawn(Arc::clone(&session), clock);

        Ok(Self {
            session,
            bots: [creator, client],
            clock,
        })
    }

    /// The shared session, for observers.
    #[must_use]
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Start play. Returns false if already started.
    pub fn start(&self) -> bool {
        lock(&self.session).start()
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        lock(&self.session).is_ended()
    }

    /// Whether both bots are still enabled.
    #[must_use]
    pub fn bots_enabled(&self) -> bool {
        self.bots.iter().all(BotHandle::is_enabled)
    }

    /// Block until the session ends or `timeout` passes.
    ///
    /// Returns whether the session ended.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_ended() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Replay of the finished game.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` while the session is still in play.
    pub fn create_replay(&self) -> Result<Replay> {
        lock(&self.session).create_replay()
    }

    /// End the session if it is running and stop every thread.
    pub fn stop(&mut self) {
        lock(&self.session).end();
        for bot in &mut self.bots {
            bot.join();
        }
        self.clock.stop();
    }
}

/// Per-bot configs timed against `clock`. The client gets the next seed.
fn bot_configs(bots: BotConfig, clock: ClockConfig) -> [BotConfig; 2] {
    let creator = bots.with_tick_interval(clock.interval);
    let client = match creator.seed {
        Some(seed) => creator.with_seed(seed.wrapping_add(1)),
        None => creator,
    };
    [creator, client]
}

impl Drop for AutoSession {
    fn drop(&mut self) {
        self.stop();
    }
}

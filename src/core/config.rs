//! Configuration values shared across the crate.
//!
//! - Session defaults (map size, skip limit, move duration)
//! - `ClockConfig`: how often a shared session is ticked
//! - `BotConfig`: the scanning bot's think-time window
//!
//! Rule-level settings live in `rules::Rule`; session construction is
//! configured through `session::SessionBuilder`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default width and height of a map, in cells.
pub const DEFAULT_MAP_SIDE: i32 = 20;

/// Smallest accepted map side.
pub const MIN_MAP_SIDE: i32 = 10;

/// Largest accepted map side.
pub const MAX_MAP_SIDE: i32 = 70;

/// Default number of counted skips that ends a session.
pub const DEFAULT_SKIP_LIMIT: u32 = 4;

/// Default seconds allowed per half-move.
pub const DEFAULT_MOVE_DURATION: u32 = 60;

/// Configuration for the session clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Interval between ticks. One tick counts as one second of move time.
    pub interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

impl ClockConfig {
    /// Create a clock configuration with the default one-second interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick interval. A zero interval is ignored.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
        }
        self
    }
}

/// Configuration for a scanning bot.
///
/// ## Think time
///
/// Before each half-move the bot sleeps for a random duration in
/// `[min_think, max_think)`. The upper bound is clamped to the session's
/// move duration, measured in clock ticks of `tick_interval` each, so the
/// bot never loses a move to the timer by waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Lower bound of the think time.
    pub min_think: Duration,

    /// Upper bound of the think time (exclusive).
    pub max_think: Duration,

    /// How long to wait between checks while it is not the bot's turn.
    pub poll_interval: Duration,

    /// Seed for the think-time RNG. `None` uses OS entropy.
    pub seed: Option<u64>,

    /// Wall-clock length of one move-timer second. Matches the
    /// [`ClockConfig::interval`] of the clock driving the session.
    pub tick_interval: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            min_think: Duration::from_millis(99),
            max_think: Duration::from_millis(500),
            poll_interval: Duration::from_millis(10),
            seed: None,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl BotConfig {
    /// Create a bot configuration with default think times.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the think-time window. Bounds are swapped if given reversed.
    #[must_use]
    pub fn with_think_time(mut self, min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_think = min;
        self.max_think = max;
        self
    }

    /// Set the idle polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Use a fixed seed for think times.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tick interval of the clock driving the session. A zero
    /// interval is ignored.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.tick_interval = interval;
        }
        self
    }

    /// Think-time window clamped to a move duration in timer seconds.
    ///
    /// The returned range is never inverted: when the lower bound exceeds
    /// the clamped upper bound, both collapse to the upper bound.
    #[must_use]
    pub fn think_window(&self, move_duration_secs: u32) -> (Duration, Duration) {
        let cap = self.tick_interval.saturating_mul(move_duration_secs);
        let max = self.max_think.min(cap);
        let min = self.min_think.min(max);
        (min, max)
    }
}

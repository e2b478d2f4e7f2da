//! Rulesets for a session.
//!
//! A `Rule` is the frozen snapshot of a session's configuration: game mode,
//! skip limit, move duration and whether rotation is allowed. Sessions take
//! one when they start and replays carry it for playback and persistence.

pub mod rule;

pub use rule::{GameMode, Rule, FALLBACK_MOVE_DURATION, FALLBACK_SKIP_LIMIT};

//! # dice-territory
//!
//! A two-player territory game engine. Players take turns placing a
//! dice-sized rectangle on a grid, growing outward from territory they
//! already own, until repeated skips end the game.
//!
//! ## Design Principles
//!
//! 1. **One Legality Engine**: Every ownership change goes through
//!    `MapModel::try_add_rectangle`, live play and replay validation alike.
//!
//! 2. **Silent Lifecycle No-Ops**: Configuring a running session or moving
//!    in an ended one does nothing and reports nothing. Only structural
//!    violations return errors.
//!
//! 3. **Immutable Values**: Rectangles, moves and rules are `Copy` values.
//!    Moving or rotating the active rectangle builds a new one.
//!
//! ## Architecture
//!
//! - **Persistent Move History**: Moves live in an `im::Vector`, so
//!   freezing a session into a replay shares structure instead of copying.
//!
//! - **Deterministic Dice**: ChaCha8 seeded from a `u64`. A seeded session
//!   rolls the same rectangles every run.
//!
//! - **Explicit Sharing**: A session driven from several threads (clock,
//!   bots, input) sits behind one mutex; see [`session::SharedSession`].
//!
//! ## Modules
//!
//! - `core`: Geometry, participants, moves, dice, configuration, text parsing
//! - `map`: Ownership grid and the legality engine
//! - `rules`: Game modes and rulesets
//! - `session`: The session state machine, events, clock and builder
//! - `replay`: Frozen games and playback
//! - `store`: Replay persistence
//! - `bot`: Scanning bots and self-playing sessions

pub mod bot;
pub mod core;
pub mod error;
pub mod map;
pub mod replay;
pub mod rules;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use crate::error::{Error, Result};

pub use crate::core::{
    BotConfig, ClockConfig,
    Extent, Rect,
    Cell, Participant, PerPlayer,
    Move, Dice,
};

pub use crate::map::{MapModel, TerritoryMap, TerritoryView};

pub use crate::rules::{GameMode, Rule};

pub use crate::session::{
    GameSession, SessionBuilder, SessionState, SessionIdCounter,
    SessionClock, SharedSession, CellMapper,
    Ended, Tick, TurnChanged, SubscriptionId,
};

pub use crate::replay::{PlaybackCursor, Replay, ReplayBase};

pub use crate::store::{load_replays, save_replays, RecordTables};

pub use crate::bot::{AutoSession, BotHandle, MovePolicy, ScanningBot};

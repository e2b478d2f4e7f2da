//! Game sessions: the turn and lifecycle state machine and its drivers.
//!
//! - `GameSession`: owns one map, the dice and the move list
//! - `SessionBuilder`: configuration and start-position setup
//! - `EventBus`: ordered subscriber lists for turn, tick and end events
//! - `SessionClock`: ticks a `SharedSession` from its own thread
//! - `CellMapper`: pixel-to-cell mapping for input layers
//! - `SessionIdCounter`: process-wide session numbering

pub mod builder;
pub mod clock;
pub mod events;
pub mod game;
pub mod ids;
pub mod input;

pub use builder::SessionBuilder;
pub use clock::{lock, share, SessionClock, SharedSession};
pub use events::{Ended, EventBus, SubscriptionId, Tick, TurnChanged};
pub use game::{GameSession, SessionState};
pub use ids::SessionIdCounter;
pub use input::CellMapper;

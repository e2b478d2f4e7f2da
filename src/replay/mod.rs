//! Replay capture and playback.
//!
//! - `Replay`: frozen snapshot of a finished game
//! - `ReplayBase`: identity and start position read back from storage
//! - `PlaybackCursor`: reconstructs the board at any half-move

pub mod cursor;
pub mod snapshot;

pub use cursor::PlaybackCursor;
pub use snapshot::{Replay, ReplayBase};

//! Bots that play through the session's public API.
//!
//! - `ScanningBot`: places at the first legal anchor from the far corner
//! - `BotHandle`: drives a policy on its own thread with a think delay
//! - `AutoSession`: two bots and a clock on one self-contained session

pub mod auto;
pub mod scanner;

pub use auto::AutoSession;
pub use scanner::{BotAction, BotHandle, MovePolicy, ScanningBot};

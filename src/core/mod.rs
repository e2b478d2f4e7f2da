//! Core value types: participants, geometry, dice, move records, configuration.
//!
//! Everything here is a plain value with no lifecycle. The map, session and
//! replay modules are built on top of these types.

pub mod config;
pub mod geometry;
pub mod player;
pub mod record;
pub mod rng;
pub mod text;

pub use config::{
    BotConfig, ClockConfig, DEFAULT_MAP_SIDE, DEFAULT_MOVE_DURATION, DEFAULT_SKIP_LIMIT,
    MAX_MAP_SIDE, MIN_MAP_SIDE,
};
pub use geometry::{Extent, Rect};
pub use player::{Cell, Participant, PerPlayer};
pub use record::Move;
pub use rng::Dice;
pub use text::{parse_bool_token, parse_extent, parse_int_or, parse_rect};

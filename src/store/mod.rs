//! Replay persistence.
//!
//! Replays are stored as three record sets joined by replay id (see
//! [`records`]), written to a single file (see [`file`]).

pub mod file;
pub mod records;

pub use file::{load_replays, load_tables, save_replays, save_tables};
pub use records::{MovesRow, RecordTables, ReplayRow, RuleRow};

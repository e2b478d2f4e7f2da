//! Error types for the territory engine.
//!
//! Three kinds describe rule-level failures:
//!
//! - **InvalidState**: operation outside its required lifecycle
//!   (replaying an unfinished session, re-seeding a ready map).
//! - **InvalidArgument**: structurally bad input (zero-area start sizes,
//!   empty move lists).
//! - **InvalidData**: persisted replay data that fails re-validation.
//!
//! Turn operations and configuration setters called in the wrong state are
//! *not* errors: they are silent no-ops and never produce an `Error`.

use thiserror::Error;

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Engine error.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation called outside the lifecycle state it requires.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Argument violates a structural requirement.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Recorded data failed validation.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Replay file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Replay file contents could not be encoded or decoded.
    #[error(transparent)]
    Encoding(#[from] bincode::Error),
}

impl Error {
    /// Whether this is an [`Error::InvalidState`].
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }

    /// Whether this is an [`Error::InvalidArgument`].
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Whether this is an [`Error::InvalidData`].
    #[must_use]
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Error::InvalidData(_))
    }
}

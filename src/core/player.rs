//! Participants, cell ownership and per-player data storage.
//!
//! ## Participant
//!
//! The two seats of a session. The creator always moves first.
//!
//! ## PerPlayer
//!
//! Fixed two-slot storage indexed by `Participant`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two seats in a session.
///
/// The numeric codes are part of the persisted move format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Participant {
    /// Session creator, owns the bottom-right start rectangle.
    Creator = 1,
    /// Session client, owns the top-left start rectangle.
    Client = 2,
}

impl Participant {
    /// Both participants in turn order.
    pub const ALL: [Participant; 2] = [Participant::Creator, Participant::Client];

    /// Persisted code (1 or 2).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a participant by persisted code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Participant::Creator),
            2 => Some(Participant::Client),
            _ => None,
        }
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Participant::Creator => Participant::Client,
            Participant::Client => Participant::Creator,
        }
    }

    /// Cell value this participant writes onto the grid.
    #[must_use]
    pub const fn cell(self) -> Cell {
        match self {
            Participant::Creator => Cell::Player1,
            Participant::Client => Cell::Player2,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Creator => write!(f, "Creator"),
            Participant::Client => write!(f, "Client"),
        }
    }
}

/// Ownership state of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Unclaimed.
    #[default]
    Empty = 0,
    /// Claimed by the creator.
    Player1 = 1,
    /// Claimed by the client.
    Player2 = 2,
}

impl Cell {
    /// Owner of this cell, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Participant> {
        match self {
            Cell::Empty => None,
            Cell::Player1 => Some(Participant::Creator),
            Cell::Player2 => Some(Participant::Client),
        }
    }

    /// Whether the cell is unclaimed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Per-player data with O(1) access.
///
/// ## Example
///
/// ```
/// use dice_territory::core::{Participant, PerPlayer};
///
/// let mut area: PerPlayer<u32> = PerPlayer::with_value(0);
/// area[Participant::Client] += 12;
///
/// assert_eq!(area[Participant::Creator], 0);
/// assert_eq!(area[Participant::Client], 12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    creator: T,
    client: T,
}

impl<T> PerPlayer<T> {
    /// Create from explicit values.
    pub const fn new(creator: T, client: T) -> Self {
        Self { creator, client }
    }

    /// Create with the same value for both seats.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            creator: value.clone(),
            client: value,
        }
    }

    /// Get a participant's value.
    #[must_use]
    pub fn get(&self, player: Participant) -> &T {
        match player {
            Participant::Creator => &self.creator,
            Participant::Client => &self.client,
        }
    }

    /// Get a participant's value mutably.
    pub fn get_mut(&mut self, player: Participant) -> &mut T {
        match player {
            Participant::Creator => &mut self.creator,
            Participant::Client => &mut self.client,
        }
    }

    /// Iterate over (Participant, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Participant, &T)> {
        [
            (Participant::Creator, &self.creator),
            (Participant::Client, &self.client),
        ]
        .into_iter()
    }
}

impl<T> Index<Participant> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Participant) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Participant> for PerPlayer<T> {
    fn index_mut(&mut self, player: Participant) -> &mut Self::Output {
        self.get_mut(player)
    }
}

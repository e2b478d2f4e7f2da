//! Move records: one immutable entry per resolved half-move.
//!
//! A `Move` captures everything needed to replay and display a half-move:
//! who acted, what was placed, how long it took, and the counters and
//! scores right after it resolved.
//!
//! ## Canonical text
//!
//! ```text
//! index; player; timeSpent; skipped(0/1); {X=a,Y=b,Width=c,Height=d};
//!     creatorPoints; clientPoints; skipCounter
//! ```
//!
//! All eight fields sit on one line, separated by `"; "`.
//!
//! Decoding is tolerant: unparsable numbers fall back to defaults
//! (time → 60, everything else → 0). Only a wrong field count is an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::geometry::Rect;
use super::player::Participant;
use super::text::{parse_int_or, parse_rect};
use crate::error::{Error, Result};

/// Field separator of the canonical text.
pub const FIELD_SEPARATOR: char = ';';

/// Number of fields in the canonical text.
pub const FIELD_COUNT: usize = 8;

/// Time recorded when the persisted value is unreadable.
pub const DEFAULT_TIME_SPENT: u32 = 60;

/// A recorded half-move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Sequence number, starting at 1. Zero only for `Move::EMPTY`.
    pub index: u32,

    /// Acting participant. `None` only for the sentinel.
    pub player: Option<Participant>,

    /// Seconds on the move timer when the half-move resolved.
    pub time_spent: u32,

    /// Placed rectangle; zero area iff the move was skipped.
    pub rect: Rect,

    /// Whether the half-move was a skip.
    pub skipped: bool,

    /// Skip counter right after this half-move.
    pub skip_counter: u32,

    /// Creator's claimed area after this half-move.
    pub creator_points: u32,

    /// Client's claimed area after this half-move.
    pub client_points: u32,
}

impl Move {
    /// Sentinel for the initial board (replay index 0).
    pub const EMPTY: Move = Move {
        index: 0,
        player: None,
        time_spent: 0,
        rect: Rect::EMPTY,
        skipped: false,
        skip_counter: 0,
        creator_points: 0,
        client_points: 0,
    };

    /// Record a successful placement.
    #[must_use]
    pub fn placed(
        index: u32,
        player: Participant,
        time_spent: u32,
        rect: Rect,
        skip_counter: u32,
        creator_points: u32,
        client_points: u32,
    ) -> Self {
        Self {
            index,
            player: Some(player),
            time_spent,
            rect,
            skipped: false,
            skip_counter,
            creator_points,
            client_points,
        }
    }

    /// Record a skipped half-move.
    #[must_use]
    pub fn skipped(
        index: u32,
        player: Participant,
        time_spent: u32,
        skip_counter: u32,
        creator_points: u32,
        client_points: u32,
    ) -> Self {
        Self {
            index,
            player: Some(player),
            time_spent,
            rect: Rect::EMPTY,
            skipped: true,
            skip_counter,
            creator_points,
            client_points,
        }
    }

    /// Whether this is the initial-board sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        *self == Move::EMPTY
    }

    /// Cells gained by this half-move.
    #[must_use]
    pub fn gained(&self) -> u32 {
        if self.skipped {
            0
        } else {
            self.rect.area()
        }
    }

    /// Encode to the canonical text form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}; {}; {}; {}; {}; {}; {}; {}",
            self.index,
            self.player.map_or(0, Participant::code),
            self.time_spent,
            u8::from(self.skipped),
            self.rect,
            self.creator_points,
            self.client_points,
            self.skip_counter,
        )
    }

    /// Decode the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidData` when the text does not have exactly
    /// eight fields. Callers that need the sentinel on failure use
    /// `Move::decode(text).unwrap_or(Move::EMPTY)`.
    pub fn decode(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::InvalidData(format!(
                "move record has {} fields, expected {FIELD_COUNT}",
                fields.len()
            )));
        }

        let player_code: i64 = parse_int_or(fields[1], 0);
        let skipped_flag: i64 = parse_int_or(fields[3], 0);

        Ok(Self {
            index: parse_int_or(fields[0], 0),
            player: Participant::from_code(player_code),
            time_spent: parse_int_or(fields[2], DEFAULT_TIME_SPENT),
            skipped: skipped_flag != 0,
            rect: parse_rect(fields[4]),
            creator_points: parse_int_or(fields[5], 0),
            client_points: parse_int_or(fields[6], 0),
            skip_counter: parse_int_or(fields[7], 0),
        })
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Move::decode(s)
    }
}

impl fmt::Display for Move {
    /// Human-readable summary, e.g. `3. Creator: +6 {(2, 3) => (13, 15)}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player = self.player.map_or_else(|| "-".to_string(), |p| p.to_string());
        if self.skipped {
            write!(
                f,
                "{}. {}: +0 {{({}, {}) => (-)}}",
                self.index, player, self.rect.width, self.rect.height
            )
        } else {
            write!(
                f,
                "{}. {}: +{} {{({}, {}) => ({}, {})}}",
                self.index,
                player,
                self.gained(),
                self.rect.width,
                self.rect.height,
                self.rect.x,
                self.rect.y
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Move {
        Move::placed(3, Participant::Creator, 17, Rect::new(13, 15, 2, 3), 0, 31, 12)
    }

    #[test]
    fn test_encode_layout() {
        assert_eq!(
            sample().encode(),
            "3; 1; 17; 0; {X=13,Y=15,Width=2,Height=3}; 31; 12; 0"
        );
    }

    #[test]
    fn test_round_trip() {
        let moves = [
            sample(),
            Move::skipped(4, Participant::Client, 60, 1, 31, 12),
            Move::EMPTY,
        ];
        for m in moves {
            assert_eq!(Move::decode(&m.encode()).unwrap(), m);
        }
    }

    #[test]
    fn test_decode_wrong_field_count() {
        let err = Move::decode("1; 1; 5").unwrap_err();
        assert!(err.is_invalid_data());
        assert_eq!(Move::decode("").unwrap_or(Move::EMPTY), Move::EMPTY);
    }

    #[test]
    fn test_decode_defaults() {
        let m = Move::decode("x; y; z; w; garbage; a; b; c").unwrap();

        assert_eq!(m.index, 0);
        assert_eq!(m.player, None);
        assert_eq!(m.time_spent, DEFAULT_TIME_SPENT);
        assert!(!m.skipped);
        assert_eq!(m.rect, Rect::EMPTY);
        assert_eq!(m.creator_points, 0);
        assert_eq!(m.client_points, 0);
        assert_eq!(m.skip_counter, 0);
    }

    #[test]
    fn test_decode_nonzero_flag_is_skip() {
        let m = Move::decode("2;2;9;5;{X=0,Y=0,Width=0,Height=0};25;12;1").unwrap();
        assert!(m.skipped);
        assert_eq!(m.player, Some(Participant::Client));
    }

    #[test]
    fn test_from_str() {
        let m: Move = sample().encode().parse().unwrap();
        assert_eq!(m, sample());
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(sample().to_string(), "3. Creator: +6 {(2, 3) => (13, 15)}");

        let skip = Move::skipped(4, Participant::Client, 60, 1, 31, 12);
        assert_eq!(skip.to_string(), "4. Client: +0 {(0, 0) => (-)}");
    }

    #[test]
    fn test_sentinel() {
        assert!(Move::EMPTY.is_sentinel());
        assert!(!sample().is_sentinel());
        assert_eq!(Move::EMPTY.gained(), 0);
    }

    #[test]
    fn test_move_serialization() {
        let json = serde_json::to_string(&sample()).unwrap();
        let deserialized: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(sample(), deserialized);
    }
}

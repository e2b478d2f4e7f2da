//! Frozen game snapshots.
//!
//! A `Replay` holds everything needed to rebuild any board of a finished
//! game: map size, both start rectangles, the ruleset and the ordered move
//! list. Index 0 of the move list is always `Move::EMPTY`, standing for the
//! initial board, so half-move `n` lives at index `n`.
//!
//! Replays come from two places:
//!
//! - [`GameSession::create_replay`](crate::session::GameSession::create_replay)
//!   on an ended session, trusted as-is.
//! - [`Replay::construct`] on persisted data, which replays every move on a
//!   fresh map and rejects the whole replay if any move is illegal.

use chrono::{DateTime, Utc};
use im::Vector;
use tracing::{debug, info};

use super::cursor::PlaybackCursor;
use crate::core::{Extent, Move, Participant, PerPlayer, Rect};
use crate::error::{Error, Result};
use crate::map::{MapModel, TerritoryView};
use crate::rules::Rule;
use crate::session::GameSession;

/// Identity and start position of a persisted replay.
///
/// Filled in by a loader before [`Replay::construct`] validates the moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayBase {
    /// Session id the replay was recorded from.
    pub id: String,
    /// Display name.
    pub name: String,
    /// When the session ended.
    pub ended_at: DateTime<Utc>,
    start: Option<MapModel>,
}

impl ReplayBase {
    /// Create a base with no start position.
    pub fn new(id: impl Into<String>, ended_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            ended_at,
            start: None,
        }
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Rebuild the start position from persisted rectangles.
    ///
    /// The rectangles must sit in their corners of a map of `map_size`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a start size has zero area, does not fit or
    ///   the rectangles overlap.
    /// - `InvalidData` if a rectangle is not where the map puts it.
    pub fn set_start_position(
        &mut self,
        map_size: Extent,
        creator: Rect,
        client: Rect,
    ) -> Result<()> {
        let mut map = MapModel::with_extent(map_size);
        map.set_start_positions(creator.extent(), client.extent())?;

        let placed = map.start_rects();
        if placed[Participant::Creator] != creator || placed[Participant::Client] != client {
            return Err(Error::InvalidData(format!(
                "start rectangles {creator} / {client} do not match a {} map",
                map.extent()
            )));
        }

        self.start = Some(map);
        Ok(())
    }

    /// Whether the start position has been set.
    #[must_use]
    pub fn is_start_position_set(&self) -> bool {
        self.start.as_ref().is_some_and(MapModel::is_ready)
    }

    /// The start position, if set.
    #[must_use]
    pub fn start_position(&self) -> Option<&MapModel> {
        self.start.as_ref()
    }
}

/// An immutable record of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replay {
    id: String,
    name: String,
    ended_at: DateTime<Utc>,
    rule: Rule,
    initial: MapModel,
    moves: Vector<Move>,
}

impl Replay {
    pub(crate) fn from_session(session: &GameSession) -> Self {
        let mut moves = Vector::new();
        moves.push_back(Move::EMPTY);
        moves.append(session.moves().clone());

        info!(session_id = %session.id(), half_moves = moves.len() - 1, "Replay created");
        Self {
            id: session.id().to_string(),
            name: String::new(),
            ended_at: session.ended_at().unwrap_or_else(Utc::now),
            rule: session.rule(),
            initial: session.map().start_position(),
            moves,
        }
    }

    /// Rebuild a replay from persisted parts, validating every move.
    ///
    /// A missing leading `Move::EMPTY` is inserted.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `moves` is empty.
    /// - `InvalidState` if `base` has no start position.
    /// - `InvalidData` if any move is out of order, has no player, is a
    ///   skip with a non-zero rectangle, is a placement with a zero-area
    ///   rectangle, or is rejected by the legality engine.
    pub fn construct(base: ReplayBase, rule: Rule, moves: Vec<Move>) -> Result<Self> {
        if moves.is_empty() {
            return Err(Error::InvalidArgument("move list is empty"));
        }
        let Some(initial) = base.start.filter(MapModel::is_ready) else {
            return Err(Error::InvalidState("start position is not set"));
        };

        let mut moves: Vector<Move> = moves.into_iter().collect();
        if moves.front() != Some(&Move::EMPTY) {
            moves.push_front(Move::EMPTY);
        }

        validate(&initial, &moves)?;
        debug!(id = %base.id, half_moves = moves.len() - 1, "Replay validated");

        Ok(Self {
            id: base.id,
            name: base.name,
            ended_at: base.ended_at,
            rule,
            initial,
            moves,
        })
    }

    /// Session id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the replay.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// When the session ended.
    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Ruleset the game was played with.
    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Map size in cells.
    #[must_use]
    pub fn map_size(&self) -> Extent {
        self.initial.extent()
    }

    /// Start rectangle of a participant.
    #[must_use]
    pub fn start_rect(&self, player: Participant) -> Rect {
        self.initial.start_rect(player)
    }

    /// Both start rectangles.
    #[must_use]
    pub fn start_rects(&self) -> PerPlayer<Rect> {
        self.initial.start_rects()
    }

    /// Area of a participant's start rectangle.
    #[must_use]
    pub fn start_points(&self, player: Participant) -> u32 {
        self.initial.area(player)
    }

    /// The initial board.
    #[must_use]
    pub fn initial_map(&self) -> &MapModel {
        &self.initial
    }

    /// All moves, with `Move::EMPTY` at index 0.
    #[must_use]
    pub fn moves(&self) -> &Vector<Move> {
        &self.moves
    }

    /// Move at a half-move index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Move> {
        self.moves.get(index).copied()
    }

    /// Number of entries, including the initial `Move::EMPTY`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the replay holds no half-moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.len() <= 1
    }

    /// Number of skipped half-moves.
    #[must_use]
    pub fn skipped_moves(&self) -> usize {
        self.moves.iter().filter(|m| m.skipped).count()
    }

    /// Claimed areas after the last half-move.
    #[must_use]
    pub fn final_areas(&self) -> PerPlayer<u32> {
        match self.moves.back() {
            Some(last) if !last.is_sentinel() => {
                PerPlayer::new(last.creator_points, last.client_points)
            }
            _ => self.initial.areas(),
        }
    }

    /// A playback cursor positioned on the initial board.
    #[must_use]
    pub fn cursor(&self) -> PlaybackCursor<'_> {
        PlaybackCursor::new(self)
    }
}

fn validate(initial: &MapModel, moves: &Vector<Move>) -> Result<()> {
    let mut map = initial.clone();
    let mut last_index = 0;

    for (position, m) in moves.iter().enumerate().skip(1) {
        let invalid = |reason: &str| Error::InvalidData(format!("half-move {position}: {reason}"));

        if m.index <= last_index {
            return Err(invalid("index out of order"));
        }
        last_index = m.index;

        let Some(player) = m.player else {
            return Err(invalid("no player"));
        };

        if m.skipped {
            if m.rect.area() != 0 {
                return Err(invalid("skipped move carries a rectangle"));
            }
            continue;
        }
        if m.rect.area() == 0 {
            return Err(invalid("placement has zero area"));
        }
        if !map.try_add_rectangle(player, m.rect) {
            return Err(invalid("illegal placement"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GameMode;

    fn base() -> ReplayBase {
        let mut base = ReplayBase::new("replay-1", Utc::now()).with_name("test");
        base.set_start_position(Extent::new(20, 20), Rect::new(15, 15, 5, 5), Rect::new(0, 0, 3, 4))
            .unwrap();
        base
    }

    fn rule() -> Rule {
        Rule::new(GameMode::StreakRule, 2, 60, false).unwrap()
    }

    fn legal_moves() -> Vec<Move> {
        vec![
            Move::placed(1, Participant::Creator, 4, Rect::new(15, 12, 2, 3), 0, 31, 12),
            Move::skipped(2, Participant::Client, 60, 1, 31, 12),
            Move::placed(3, Participant::Creator, 9, Rect::new(13, 15, 2, 2), 0, 35, 12),
        ]
    }

    #[test]
    fn test_base_start_position() {
        let b = base();
        assert!(b.is_start_position_set());
        assert_eq!(b.start_position().unwrap().area(Participant::Creator), 25);
        assert!(!ReplayBase::new("x", Utc::now()).is_start_position_set());
    }

    #[test]
    fn test_base_rejects_misplaced_start() {
        let mut b = ReplayBase::new("x", Utc::now());
        let err = b
            .set_start_position(Extent::new(20, 20), Rect::new(10, 10, 5, 5), Rect::new(0, 0, 3, 4))
            .unwrap_err();
        assert!(err.is_invalid_data());
        assert!(!b.is_start_position_set());
    }

    #[test]
    fn test_construct_inserts_sentinel() {
        let replay = Replay::construct(base(), rule(), legal_moves()).unwrap();

        assert_eq!(replay.len(), 4);
        assert_eq!(replay.get(0), Some(Move::EMPTY));
        assert_eq!(replay.skipped_moves(), 1);
        assert_eq!(replay.name(), "test");
        assert_eq!(replay.final_areas(), PerPlayer::new(35, 12));
    }

    #[test]
    fn test_construct_keeps_existing_sentinel() {
        let mut moves = vec![Move::EMPTY];
        moves.extend(legal_moves());
        let replay = Replay::construct(base(), rule(), moves).unwrap();
        assert_eq!(replay.len(), 4);
    }

    #[test]
    fn test_construct_empty_moves() {
        let err = Replay::construct(base(), rule(), Vec::new()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_construct_without_start() {
        let err = Replay::construct(ReplayBase::new("x", Utc::now()), rule(), legal_moves())
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_construct_rejects_illegal_move() {
        let mut moves = legal_moves();
        // Client cannot claim cells the creator already owns
        moves[1] = Move::placed(2, Participant::Client, 5, Rect::new(15, 12, 2, 3), 0, 31, 18);

        let err = Replay::construct(base(), rule(), moves).unwrap_err();
        assert!(err.is_invalid_data());
    }

    #[test]
    fn test_construct_rejects_skip_with_rect() {
        let mut moves = legal_moves();
        moves[1].rect = Rect::new(3, 0, 1, 1);
        assert!(Replay::construct(base(), rule(), moves).unwrap_err().is_invalid_data());
    }

    #[test]
    fn test_construct_rejects_zero_area_placement() {
        let mut moves = legal_moves();
        moves[0].rect = Rect::new(15, 12, 0, 3);
        assert!(Replay::construct(base(), rule(), moves).unwrap_err().is_invalid_data());
    }

    #[test]
    fn test_construct_rejects_unordered_indices() {
        let mut moves = legal_moves();
        moves.swap(0, 2);
        assert!(Replay::construct(base(), rule(), moves).unwrap_err().is_invalid_data());
    }

    #[test]
    fn test_start_points() {
        let replay = Replay::construct(base(), rule(), legal_moves()).unwrap();
        assert_eq!(replay.start_points(Participant::Creator), 25);
        assert_eq!(replay.start_points(Participant::Client), 12);
        assert_eq!(replay.map_size(), Extent::new(20, 20));
    }

    #[test]
    fn test_set_name() {
        let mut replay = Replay::construct(base(), rule(), legal_moves()).unwrap();
        replay.set_name("final");
        assert_eq!(replay.name(), "final");
    }
}

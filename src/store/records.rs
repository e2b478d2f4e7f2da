//! The three record sets of the replay store.
//!
//! Every field is kept as text, exactly as it is persisted:
//!
//! - `ReplayRow`: id, name, end time (RFC 3339), creator start rectangle,
//!   client start rectangle, map size
//! - `RuleRow`: id, mode code, skip limit, move duration, rotation token
//! - `MovesRow`: id, then one canonical move per half-move, starting with
//!   the initial `Move::EMPTY`
//!
//! Rows are joined by id on load. A replay whose rows are missing or fail
//! validation is skipped with a warning; the rest still load.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{parse_extent, parse_rect, Move, Participant};
use crate::error::{Error, Result};
use crate::replay::{Replay, ReplayBase};
use crate::rules::Rule;

/// Token written for an enabled flag.
const TRUE_TOKEN: &str = "TRUE";

/// Token written for a disabled flag.
const FALSE_TOKEN: &str = "FALSE";

/// Identity and start position of one replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRow {
    pub id: String,
    pub name: String,
    pub ended_at: String,
    pub creator_start: String,
    pub client_start: String,
    pub map_size: String,
}

/// Ruleset of one replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    pub id: String,
    pub mode: String,
    pub skip_limit: String,
    pub move_duration: String,
    pub rotation_allowed: String,
}

/// Move list of one replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovesRow {
    pub id: String,
    pub moves: Vec<String>,
}

/// All three record sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTables {
    pub replays: Vec<ReplayRow>,
    pub rules: Vec<RuleRow>,
    pub moves: Vec<MovesRow>,
}

impl ReplayRow {
    /// Row for a replay.
    #[must_use]
    pub fn from_replay(replay: &Replay) -> Self {
        Self {
            id: replay.id().to_string(),
            name: replay.name().to_string(),
            ended_at: replay.ended_at().to_rfc3339(),
            creator_start: replay.start_rect(Participant::Creator).to_string(),
            client_start: replay.start_rect(Participant::Client).to_string(),
            map_size: replay.map_size().to_string(),
        }
    }

    /// Parse into a `ReplayBase` with its start position set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` for an unreadable end time and whatever
    /// [`ReplayBase::set_start_position`] reports for the rectangles.
    pub fn to_base(&self) -> Result<ReplayBase> {
        let ended_at = DateTime::parse_from_rfc3339(self.ended_at.trim())
            .map_err(|err| Error::InvalidData(format!("end time {:?}: {err}", self.ended_at)))?
            .with_timezone(&Utc);

        let mut base = ReplayBase::new(self.id.clone(), ended_at).with_name(self.name.clone());
        base.set_start_position(
            parse_extent(&self.map_size),
            parse_rect(&self.creator_start),
            parse_rect(&self.client_start),
        )?;
        Ok(base)
    }
}

impl RuleRow {
    /// Row for a replay's ruleset.
    #[must_use]
    pub fn from_replay(replay: &Replay) -> Self {
        let rule = replay.rule();
        Self {
            id: replay.id().to_string(),
            mode: rule.mode().code().to_string(),
            skip_limit: rule.skip_limit().to_string(),
            move_duration: rule.move_duration().to_string(),
            rotation_allowed: if rule.rotation_allowed() {
                TRUE_TOKEN
            } else {
                FALSE_TOKEN
            }
            .to_string(),
        }
    }

    /// Parse the ruleset. Never fails; see [`Rule::parse_lenient`].
    #[must_use]
    pub fn to_rule(&self) -> Rule {
        Rule::parse_lenient(
            &self.mode,
            &self.skip_limit,
            &self.move_duration,
            &self.rotation_allowed,
        )
    }
}

impl MovesRow {
    /// Row for a replay's moves, including the initial `Move::EMPTY`.
    #[must_use]
    pub fn from_replay(replay: &Replay) -> Self {
        Self {
            id: replay.id().to_string(),
            moves: replay.moves().iter().map(Move::encode).collect(),
        }
    }

    /// Decode moves up to the first unreadable one.
    #[must_use]
    pub fn to_moves(&self) -> Vec<Move> {
        self.moves.iter().map_while(|text| Move::decode(text).ok()).collect()
    }
}

impl RecordTables {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the three record sets for `replays`.
    #[must_use]
    pub fn export(replays: &[Replay]) -> Self {
        Self {
            replays: replays.iter().map(ReplayRow::from_replay).collect(),
            rules: replays.iter().map(RuleRow::from_replay).collect(),
            moves: replays.iter().map(MovesRow::from_replay).collect(),
        }
    }

    /// Number of replay rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replays.len()
    }

    /// Whether there are no replay rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replays.is_empty()
    }

    /// Rebuild every loadable replay, in row order.
    ///
    /// Rows that cannot be joined or fail validation are skipped.
    #[must_use]
    pub fn load_replays(&self) -> Vec<Replay> {
        let rules: FxHashMap<&str, &RuleRow> =
            self.rules.iter().map(|r| (r.id.as_str(), r)).collect();
        let moves: FxHashMap<&str, &MovesRow> =
            self.moves.iter().map(|m| (m.id.as_str(), m)).collect();

        let loaded: Vec<Replay> = self
            .replays
            .iter()
            .filter_map(|row| match load_one(row, &rules, &moves) {
                Ok(replay) => Some(replay),
                Err(err) => {
                    warn!(id = %row.id, %err, "Skipping unreadable replay record");
                    None
                }
            })
            .collect();

        debug!(rows = self.replays.len(), loaded = loaded.len(), "Replay records loaded");
        loaded
    }
}

fn load_one(
    row: &ReplayRow,
    rules: &FxHashMap<&str, &RuleRow>,
    moves: &FxHashMap<&str, &MovesRow>,
) -> Result<Replay> {
    let rule = rules
        .get(row.id.as_str())
        .ok_or_else(|| Error::InvalidData("no rule record".to_string()))?
        .to_rule();
    let moves = moves
        .get(row.id.as_str())
        .ok_or_else(|| Error::InvalidData("no moves record".to_string()))?
        .to_moves();

    Replay::construct(row.to_base()?, rule, moves)
}

//! Rulesets: how skips end a game.
//!
//! ## Modes
//!
//! - `StreakRule`: the skip counter resets on every successful placement,
//!   so only an unbroken streak of skips ends the game.
//! - `AccumulationRule`: each successful placement lowers the counter by
//!   one (never below zero), so skips accumulate over the game.
//!
//! In both modes the game ends on the skip that brings the counter to the
//! skip limit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::{DEFAULT_MOVE_DURATION, DEFAULT_SKIP_LIMIT};
use crate::core::text::{parse_bool_token, parse_int_or};
use crate::error::{Error, Result};

/// Skip limit used when a persisted value is unreadable.
pub const FALLBACK_SKIP_LIMIT: u32 = 2;

/// Move duration used when a persisted value is unreadable.
pub const FALLBACK_MOVE_DURATION: u32 = 60;

/// How successful placements affect the skip counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameMode {
    /// Counter resets to zero on every placement.
    #[default]
    StreakRule = 0,
    /// Counter decreases by one on every placement, floored at zero.
    AccumulationRule = 1,
}

impl GameMode {
    /// Persisted code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a mode by persisted code. Unknown codes map to `StreakRule`.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => GameMode::AccumulationRule,
            _ => GameMode::StreakRule,
        }
    }

    /// Parse a persisted mode cell: a numeric code or the mode name.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(code) => Self::from_code(code),
            Err(_) if text == "AccumulationRule" => GameMode::AccumulationRule,
            Err(_) => GameMode::StreakRule,
        }
    }

    /// Skip counter after a successful placement.
    #[must_use]
    pub const fn after_placement(self, counter: u32) -> u32 {
        match self {
            GameMode::StreakRule => 0,
            GameMode::AccumulationRule => counter.saturating_sub(1),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::StreakRule => write!(f, "StreakRule"),
            GameMode::AccumulationRule => write!(f, "AccumulationRule"),
        }
    }
}

/// Immutable ruleset snapshot.
///
/// ## Invariants
///
/// - `skip_limit > 0`
/// - `move_duration > 0`
///
/// Deserialization goes through [`Rule::new`], so both hold for loaded
/// rules too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RuleFields")]
pub struct Rule {
    mode: GameMode,
    skip_limit: u32,
    move_duration: u32,
    rotation_allowed: bool,
}

#[derive(Deserialize)]
struct RuleFields {
    mode: GameMode,
    skip_limit: u32,
    move_duration: u32,
    rotation_allowed: bool,
}

impl TryFrom<RuleFields> for Rule {
    type Error = Error;

    fn try_from(fields: RuleFields) -> Result<Self> {
        Self::new(
            fields.mode,
            fields.skip_limit,
            fields.move_duration,
            fields.rotation_allowed,
        )
    }
}

impl Rule {
    /// Create a ruleset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the skip limit or move duration is zero.
    pub fn new(
        mode: GameMode,
        skip_limit: u32,
        move_duration: u32,
        rotation_allowed: bool,
    ) -> Result<Self> {
        if skip_limit == 0 {
            return Err(Error::InvalidArgument("skip limit must be positive"));
        }
        if move_duration == 0 {
            return Err(Error::InvalidArgument("move duration must be positive"));
        }
        Ok(Self {
            mode,
            skip_limit,
            move_duration,
            rotation_allowed,
        })
    }

    /// Build a ruleset from persisted cells, never failing.
    ///
    /// Unreadable or zero values fall back to `FALLBACK_SKIP_LIMIT` and
    /// `FALLBACK_MOVE_DURATION`; rotation is on only for a "true" token.
    #[must_use]
    pub fn parse_lenient(
        mode: &str,
        skip_limit: &str,
        move_duration: &str,
        rotation_allowed: &str,
    ) -> Self {
        let skip_limit = match parse_int_or(skip_limit, 0u32) {
            0 => FALLBACK_SKIP_LIMIT,
            n => n,
        };
        let move_duration = match parse_int_or(move_duration, 0u32) {
            0 => FALLBACK_MOVE_DURATION,
            n => n,
        };
        Self {
            mode: GameMode::parse_lenient(mode),
            skip_limit,
            move_duration,
            rotation_allowed: parse_bool_token(rotation_allowed),
        }
    }

    /// Game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Counted skips that end the game.
    #[must_use]
    pub fn skip_limit(&self) -> u32 {
        self.skip_limit
    }

    /// Seconds per half-move.
    #[must_use]
    pub fn move_duration(&self) -> u32 {
        self.move_duration
    }

    /// Whether the active rectangle may be rotated.
    #[must_use]
    pub fn rotation_allowed(&self) -> bool {
        self.rotation_allowed
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            mode: GameMode::StreakRule,
            skip_limit: DEFAULT_SKIP_LIMIT,
            move_duration: DEFAULT_MOVE_DURATION,
            rotation_allowed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_codes() {
        assert_eq!(GameMode::StreakRule.code(), 0);
        assert_eq!(GameMode::AccumulationRule.code(), 1);
        assert_eq!(GameMode::from_code(1), GameMode::AccumulationRule);
        assert_eq!(GameMode::from_code(0), GameMode::StreakRule);
        assert_eq!(GameMode::from_code(9), GameMode::StreakRule);
    }

    #[test]
    fn test_mode_parse_lenient() {
        assert_eq!(GameMode::parse_lenient(" 1 "), GameMode::AccumulationRule);
        assert_eq!(GameMode::parse_lenient("AccumulationRule"), GameMode::AccumulationRule);
        assert_eq!(GameMode::parse_lenient("StreakRule"), GameMode::StreakRule);
        assert_eq!(GameMode::parse_lenient("???"), GameMode::StreakRule);
    }

    #[test]
    fn test_after_placement() {
        assert_eq!(GameMode::StreakRule.after_placement(3), 0);
        assert_eq!(GameMode::AccumulationRule.after_placement(3), 2);
        assert_eq!(GameMode::AccumulationRule.after_placement(0), 0);
    }

    #[test]
    fn test_rule_validation() {
        assert!(Rule::new(GameMode::StreakRule, 0, 60, false).unwrap_err().is_invalid_argument());
        assert!(Rule::new(GameMode::StreakRule, 2, 0, false).unwrap_err().is_invalid_argument());

        let rule = Rule::new(GameMode::AccumulationRule, 3, 30, true).unwrap();
        assert_eq!(rule.mode(), GameMode::AccumulationRule);
        assert_eq!(rule.skip_limit(), 3);
        assert_eq!(rule.move_duration(), 30);
        assert!(rule.rotation_allowed());
    }

    #[test]
    fn test_rule_default() {
        let rule = Rule::default();
        assert_eq!(rule.mode(), GameMode::StreakRule);
        assert_eq!(rule.skip_limit(), 4);
        assert_eq!(rule.move_duration(), 60);
        assert!(!rule.rotation_allowed());
    }

    #[test]
    fn test_rule_parse_lenient() {
        let rule = Rule::parse_lenient("1", "5", "45", "ИСТИНА");
        assert_eq!(rule, Rule::new(GameMode::AccumulationRule, 5, 45, true).unwrap());

        let fallback = Rule::parse_lenient("x", "many", "", "yes");
        assert_eq!(fallback.mode(), GameMode::StreakRule);
        assert_eq!(fallback.skip_limit(), FALLBACK_SKIP_LIMIT);
        assert_eq!(fallback.move_duration(), FALLBACK_MOVE_DURATION);
        assert!(!fallback.rotation_allowed());
    }

    #[test]
    fn test_rule_serialization() {
        let rule = Rule::new(GameMode::AccumulationRule, 3, 30, true).unwrap();
        let json = serde_json::to_string(&rule).unwrap();
        let deserialized: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, deserialized);
    }

    #[test]
    fn test_rule_deserialize_rejects_zero_limits() {
        let fields = |skips: u32, seconds: u32| {
            serde_json::json!({
                "mode": "StreakRule",
                "skip_limit": skips,
                "move_duration": seconds,
                "rotation_allowed": false,
            })
        };

        assert!(serde_json::from_value::<Rule>(fields(3, 30)).is_ok());
        assert!(serde_json::from_value::<Rule>(fields(0, 30)).is_err());
        assert!(serde_json::from_value::<Rule>(fields(3, 0)).is_err());
    }
}

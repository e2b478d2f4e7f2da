//! Session construction.
//!
//! ## Defaults
//!
//! | Setting        | Default              |
//! |----------------|----------------------|
//! | map size       | 20 × 20              |
//! | mode           | `StreakRule`         |
//! | skip limit     | 4                    |
//! | move duration  | 60 s                 |
//! | rotation       | off                  |
//! | dice           | seeded from entropy  |
//! | start sizes    | rolled with the dice |
//! | id counter     | process-wide counter |

use std::sync::Arc;
use tracing::warn;

use super::game::GameSession;
use super::ids::SessionIdCounter;
use crate::core::{Dice, Extent, DEFAULT_MAP_SIDE};
use crate::error::Result;
use crate::map::MapModel;
use crate::rules::{GameMode, Rule};

/// Rolls attempted before falling back to 1 × 1 start rectangles.
const MAX_START_ROLLS: usize = 64;

/// Builder for a `GameSession`.
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    map_size: Extent,
    mode: GameMode,
    skip_limit: u32,
    move_duration: u32,
    rotation_allowed: bool,
    seed: Option<u64>,
    start_sizes: Option<(Extent, Extent)>,
    id_counter: Option<Arc<SessionIdCounter>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        let rule = Rule::default();
        Self {
            map_size: Extent::new(DEFAULT_MAP_SIDE, DEFAULT_MAP_SIDE),
            mode: rule.mode(),
            skip_limit: rule.skip_limit(),
            move_duration: rule.move_duration(),
            rotation_allowed: rule.rotation_allowed(),
            seed: None,
            start_sizes: None,
            id_counter: None,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map size in cells. Out-of-range sides fall back to the default.
    pub fn map_size(mut self, width: i32, height: i32) -> Self {
        self.map_size = Extent::new(width, height);
        self
    }

    pub fn mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Skip limit. Zero is ignored.
    pub fn skip_limit(mut self, limit: u32) -> Self {
        if limit > 0 {
            self.skip_limit = limit;
        }
        self
    }

    /// Move duration in seconds. Zero is ignored.
    pub fn move_duration(mut self, seconds: u32) -> Self {
        if seconds > 0 {
            self.move_duration = seconds;
        }
        self
    }

    pub fn rotation_allowed(mut self, allowed: bool) -> Self {
        self.rotation_allowed = allowed;
        self
    }

    /// Apply every setting of a ruleset.
    pub fn rule(self, rule: Rule) -> Self {
        self.mode(rule.mode())
            .skip_limit(rule.skip_limit())
            .move_duration(rule.move_duration())
            .rotation_allowed(rule.rotation_allowed())
    }

    /// Seed the dice for a reproducible session.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use fixed start sizes instead of rolling them.
    pub fn start_sizes(mut self, creator: Extent, client: Extent) -> Self {
        self.start_sizes = Some((creator, client));
        self
    }

    /// Draw the session number from a private counter.
    pub fn id_counter(mut self, counter: Arc<SessionIdCounter>) -> Self {
        self.id_counter = Some(counter);
        self
    }

    /// Build the session in the `Created` state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if explicit start sizes have zero area,
    /// overlap or do not fit on the map.
    pub fn build(self) -> Result<GameSession> {
        let rule = Rule::new(
            self.mode,
            self.skip_limit,
            self.move_duration,
            self.rotation_allowed,
        )?;
        let mut dice = match self.seed {
            Some(seed) => Dice::new(seed),
            None => Dice::from_entropy(),
        };

        let mut map = MapModel::with_extent(self.map_size);
        match self.start_sizes {
            Some((creator, client)) => map.set_start_positions(creator, client)?,
            None => roll_start_positions(&mut map, &mut dice),
        }

        let id = match &self.id_counter {
            Some(counter) => counter.next_id(),
            None => SessionIdCounter::global().next_id(),
        };

        Ok(GameSession::assemble(id, rule, map, dice))
    }
}

fn roll_start_positions(map: &mut MapModel, dice: &mut Dice) {
    for _ in 0..MAX_START_ROLLS {
        let client = dice.roll();
        let creator = dice.roll();
        if map.set_start_positions(creator, client).is_ok() {
            return;
        }
    }

    // 1 × 1 corners fit on any accepted map size
    if let Err(err) = map.set_start_positions(Extent::new(1, 1), Extent::new(1, 1)) {
        warn!(%err, "Could not place start rectangles");
    }
}

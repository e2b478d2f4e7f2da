//! The legality engine.
//!
//! `MapModel` wraps a `TerritoryMap` and is the only way a session changes
//! ownership. Every placement goes through the same checks:
//!
//! 1. The map is ready (start rectangles are set).
//! 2. The rectangle has positive size and lies fully on the map.
//! 3. Every covered cell is empty.
//! 4. At least one cell just outside the rectangle, sharing an edge with
//!    it, already belongs to the acting player. Corners do not count; a
//!    single touching cell on any side is enough.
//!
//! A rejected placement leaves the model untouched.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::territory::TerritoryMap;
use super::TerritoryView;
use crate::core::{Cell, Extent, Participant, PerPlayer, Rect};
use crate::error::{Error, Result};

/// Ownership grid plus the bookkeeping needed to play on it.
///
/// `Clone` is a deep copy with its own backing grid, so a clone can be
/// mutated freely (previews, replay reconstruction) without touching the
/// source.
///
/// Deserialization re-checks the bookkeeping against the grid: areas must
/// match the owned cell counts, and a ready model's start rectangles must
/// lie on the map, fully owned by their participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapModelFields")]
pub struct MapModel {
    grid: TerritoryMap,
    areas: PerPlayer<u32>,
    start: PerPlayer<Rect>,
    ready: bool,
}

#[derive(Deserialize)]
struct MapModelFields {
    grid: TerritoryMap,
    areas: PerPlayer<u32>,
    start: PerPlayer<Rect>,
    ready: bool,
}

impl TryFrom<MapModelFields> for MapModel {
    type Error = Error;

    fn try_from(fields: MapModelFields) -> Result<Self> {
        let MapModelFields {
            grid,
            areas,
            start,
            ready,
        } = fields;

        for player in Participant::ALL {
            let owned = grid.count(player.cell());
            if areas[player] != owned {
                return Err(Error::InvalidData(format!(
                    "{player} area {} disagrees with {owned} owned cells",
                    areas[player]
                )));
            }
        }

        if ready {
            for player in Participant::ALL {
                let rect = start[player];
                let held = grid.contains_rect(rect)
                    && rect
                        .cells()
                        .all(|(x, y)| grid.get(x, y) == Some(player.cell()));
                if !held {
                    return Err(Error::InvalidData(format!(
                        "{player} start {rect} is not owned on the map"
                    )));
                }
            }
        } else if !grid.is_empty() || start != PerPlayer::with_value(Rect::EMPTY) {
            return Err(Error::InvalidData(
                "map without start positions holds territory".to_string(),
            ));
        }

        Ok(Self {
            grid,
            areas,
            start,
            ready,
        })
    }
}

impl MapModel {
    /// Create an empty, not-yet-ready model.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_grid(TerritoryMap::new(width, height))
    }

    /// Create an empty model from a requested size.
    #[must_use]
    pub fn with_extent(size: Extent) -> Self {
        Self::new(size.width, size.height)
    }

    fn from_grid(grid: TerritoryMap) -> Self {
        Self {
            grid,
            areas: PerPlayer::with_value(0),
            start: PerPlayer::with_value(Rect::EMPTY),
            ready: false,
        }
    }

    /// Whether the start rectangles have been placed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Both start rectangles (`Rect::EMPTY` until ready).
    #[must_use]
    pub fn start_rects(&self) -> PerPlayer<Rect> {
        self.start
    }

    /// Claimed cells per participant.
    #[must_use]
    pub fn areas(&self) -> PerPlayer<u32> {
        self.areas
    }

    /// Total claimed cells.
    #[must_use]
    pub fn claimed(&self) -> u32 {
        self.areas.iter().map(|(_, &a)| a).sum()
    }

    /// Place both start rectangles.
    ///
    /// The client rectangle is anchored at the top-left corner, the creator
    /// rectangle at the bottom-right corner.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the start rectangles were already placed.
    /// - `InvalidArgument` if either size has zero area, does not fit on the
    ///   map, or the two rectangles would overlap.
    pub fn set_start_positions(
        &mut self,
        creator_size: Extent,
        client_size: Extent,
    ) -> Result<()> {
        if self.ready {
            return Err(Error::InvalidState("start positions are already set"));
        }
        if creator_size.is_degenerate() || client_size.is_degenerate() {
            return Err(Error::InvalidArgument("start rectangle has zero area"));
        }

        let client = Rect::at(0, 0, client_size);
        let creator = Rect::at(
            self.grid.width() - creator_size.width,
            self.grid.height() - creator_size.height,
            creator_size,
        );

        if !self.grid.contains_rect(client) || !self.grid.contains_rect(creator) {
            return Err(Error::InvalidArgument("start rectangle does not fit on the map"));
        }
        if client.intersects(creator) {
            return Err(Error::InvalidArgument("start rectangles overlap"));
        }

        self.claim(Participant::Creator, creator);
        self.claim(Participant::Client, client);
        self.start = PerPlayer::new(creator, client);
        self.ready = true;

        trace!(%creator, %client, "start positions set");
        Ok(())
    }

    /// A fresh model holding only the start rectangles of this one.
    #[must_use]
    pub fn start_position(&self) -> MapModel {
        let mut map = Self::from_grid(TerritoryMap::with_extent(self.grid.extent()));
        if self.ready {
            for player in Participant::ALL {
                map.claim(player, self.start[player]);
            }
            map.start = self.start;
            map.ready = true;
        }
        map
    }

    /// Whether `player` could legally place `rect` right now.
    #[must_use]
    pub fn can_place(&self, player: Participant, rect: Rect) -> bool {
        self.ready && self.grid.is_vacant(rect) && self.touches_territory(player, rect)
    }

    /// Try to claim `rect` for `player`.
    ///
    /// Returns false with no side effects when the placement is illegal.
    pub fn try_add_rectangle(&mut self, player: Participant, rect: Rect) -> bool {
        if !self.can_place(player, rect) {
            trace!(%player, %rect, "placement rejected");
            return false;
        }

        self.claim(player, rect);
        true
    }

    fn claim(&mut self, player: Participant, rect: Rect) {
        let written = self.grid.fill(rect, player.cell());
        self.areas[player] += written;
    }

    /// Whether any cell edge-adjacent to `rect` belongs to `player`.
    fn touches_territory(&self, player: Participant, rect: Rect) -> bool {
        let owned = |x: i32, y: i32| self.grid.get(x, y) == Some(player.cell());

        let above_or_below =
            (rect.x..rect.right()).any(|x| owned(x, rect.y - 1) || owned(x, rect.bottom()));
        let left_or_right =
            (rect.y..rect.bottom()).any(|y| owned(rect.x - 1, y) || owned(rect.right(), y));

        above_or_below || left_or_right
    }
}

impl TerritoryView for MapModel {
    fn grid(&self) -> &TerritoryMap {
        &self.grid
    }

    fn area(&self, player: Participant) -> u32 {
        self.areas[player]
    }

    fn start_rect(&self, player: Participant) -> Rect {
        self.start[player]
    }
}

/// Convenience for callers that only have a cell value.
impl MapModel {
    /// Read a cell. `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.get(x, y)
    }
}

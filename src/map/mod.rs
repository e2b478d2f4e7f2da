//! Maps: the raw ownership grid and the legality engine on top of it.
//!
//! ## TerritoryView
//!
//! Renderers and other read-only consumers take `&impl TerritoryView`.
//! Both a live `MapModel` and a replay `PlaybackCursor` implement it, so the
//! same drawing code serves live games and playback.

pub mod model;
pub mod territory;

pub use model::MapModel;
pub use territory::TerritoryMap;

use crate::core::{Cell, Extent, Participant, Rect};

/// Read-only view of a board.
pub trait TerritoryView {
    /// The underlying grid.
    fn grid(&self) -> &TerritoryMap;

    /// Claimed cells of a participant.
    fn area(&self, player: Participant) -> u32;

    /// Start rectangle of a participant (`Rect::EMPTY` if not set).
    fn start_rect(&self, player: Participant) -> Rect;

    /// Board size in cells.
    fn extent(&self) -> Extent {
        self.grid().extent()
    }

    /// Read a cell. `None` when out of bounds.
    fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid().get(x, y)
    }

    /// Iterate over `(x, y, cell)`.
    fn cells(&self) -> Box<dyn Iterator<Item = (i32, i32, Cell)> + '_> {
        Box::new(self.grid().cells())
    }
}

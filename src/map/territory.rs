//! Raw ownership grid.
//!
//! `TerritoryMap` knows nothing about legality. It stores one `Cell` per
//! position and lets its owner read and write them. Only `MapModel` writes
//! to a live session map.

use serde::{Deserialize, Serialize};

use crate::core::config::{DEFAULT_MAP_SIDE, MAX_MAP_SIDE, MIN_MAP_SIDE};
use crate::core::{Cell, Extent, Rect};
use crate::error::Error;

/// Fixed-size grid of cell ownership, stored column-major.
///
/// Deserialization rejects sides outside `[MIN_MAP_SIDE, MAX_MAP_SIDE]`
/// and cell vectors whose length disagrees with the sides.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TerritoryFields")]
pub struct TerritoryMap {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct TerritoryFields {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl TryFrom<TerritoryFields> for TerritoryMap {
    type Error = Error;

    fn try_from(fields: TerritoryFields) -> Result<Self, Self::Error> {
        let size = Extent::new(fields.width, fields.height);
        if Self::adjust_size(size) != size {
            return Err(Error::InvalidData(format!("map size {size} out of range")));
        }
        let len = (size.width as usize) * (size.height as usize);
        if fields.cells.len() != len {
            return Err(Error::InvalidData(format!(
                "map {size} holds {} cells, expected {len}",
                fields.cells.len()
            )));
        }
        Ok(Self {
            width: fields.width,
            height: fields.height,
            cells: fields.cells,
        })
    }
}

impl TerritoryMap {
    /// Create an empty map.
    ///
    /// Sizes are adjusted with [`TerritoryMap::adjust_size`].
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let size = Self::adjust_size(Extent::new(width, height));
        let len = (size.width as usize) * (size.height as usize);
        Self {
            width: size.width,
            height: size.height,
            cells: vec![Cell::Empty; len],
        }
    }

    /// Create an empty map from an extent.
    #[must_use]
    pub fn with_extent(size: Extent) -> Self {
        Self::new(size.width, size.height)
    }

    /// Normalize a requested map size.
    ///
    /// A non-positive side resets both sides to the default. Any side
    /// outside `[MIN_MAP_SIDE, MAX_MAP_SIDE]` resets to the default.
    #[must_use]
    pub fn adjust_size(size: Extent) -> Extent {
        let mut size = size;
        if size.is_degenerate() {
            size = Extent::new(DEFAULT_MAP_SIDE, DEFAULT_MAP_SIDE);
        }
        if !(MIN_MAP_SIDE..=MAX_MAP_SIDE).contains(&size.width) {
            size.width = DEFAULT_MAP_SIDE;
        }
        if !(MIN_MAP_SIDE..=MAX_MAP_SIDE).contains(&size.height) {
            size.height = DEFAULT_MAP_SIDE;
        }
        size
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size in cells.
    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> u32 {
        self.extent().area()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((x as usize) * (self.height as usize) + (y as usize))
    }

    /// Whether the rectangle has positive size and lies fully on the map.
    #[must_use]
    pub fn contains_rect(&self, rect: Rect) -> bool {
        !rect.is_degenerate()
            && rect.x >= 0
            && rect.y >= 0
            && rect.x <= self.width - rect.width
            && rect.y <= self.height - rect.height
    }

    /// Read a cell. `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write a cell. Returns false when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Write `cell` into every in-bounds cell of `rect`.
    ///
    /// Returns the number of cells written.
    pub fn fill(&mut self, rect: Rect, cell: Cell) -> u32 {
        if rect.is_degenerate() {
            return 0;
        }
        // Clip to the map before touching any coordinates
        let (x0, x1) = (rect.x.max(0), rect.right().min(self.width));
        let (y0, y1) = (rect.y.max(0), rect.bottom().min(self.height));
        let mut written = 0;
        for x in x0..x1 {
            for y in y0..y1 {
                if self.set(x, y, cell) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Whether every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Whether every cell of `rect` is on the map and empty.
    #[must_use]
    pub fn is_vacant(&self, rect: Rect) -> bool {
        self.contains_rect(rect)
            && rect
                .cells()
                .all(|(x, y)| self.get(x, y) == Some(Cell::Empty))
    }

    /// Number of cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> u32 {
        self.cells.iter().filter(|&&c| c == cell).count() as u32
    }

    /// Iterate over `(x, y, cell)`, column by column.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let height = self.height.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| ((i / height) as i32, (i % height) as i32, cell))
    }
}

impl Default for TerritoryMap {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_SIDE, DEFAULT_MAP_SIDE)
    }
}

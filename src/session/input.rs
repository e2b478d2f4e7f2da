//! Screen-to-cell mapping for input layers.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Smallest accepted cell size in pixels.
pub const MIN_CELL_SIZE: i32 = 5;

/// Largest accepted cell size in pixels.
pub const MAX_CELL_SIZE: i32 = 150;

/// Default cell size in pixels.
pub const DEFAULT_CELL_SIZE: i32 = 25;

/// Maps pixel positions on a drawn board to cell coordinates.
///
/// ```
/// use dice_territory::session::CellMapper;
///
/// let mapper = CellMapper::new().with_origin(10, 10);
/// assert_eq!(mapper.to_cell(10, 10), (0, 0));
/// assert_eq!(mapper.to_cell(64, 35), (2, 1));
/// ```
///
/// Deserialization rejects cell sizes outside
/// `[MIN_CELL_SIZE, MAX_CELL_SIZE]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CellMapperFields")]
pub struct CellMapper {
    origin_x: i32,
    origin_y: i32,
    cell_size: i32,
}

#[derive(Deserialize)]
struct CellMapperFields {
    origin_x: i32,
    origin_y: i32,
    cell_size: i32,
}

impl TryFrom<CellMapperFields> for CellMapper {
    type Error = Error;

    fn try_from(fields: CellMapperFields) -> Result<Self, Self::Error> {
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&fields.cell_size) {
            return Err(Error::InvalidData(format!(
                "cell size {} out of range",
                fields.cell_size
            )));
        }
        Ok(Self {
            origin_x: fields.origin_x,
            origin_y: fields.origin_y,
            cell_size: fields.cell_size,
        })
    }
}

impl Default for CellMapper {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl CellMapper {
    /// Mapper with the board drawn at (0, 0) and the default cell size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pixel position of the board's top-left corner.
    #[must_use]
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Set the cell size. Values outside `[MIN_CELL_SIZE, MAX_CELL_SIZE]`
    /// are ignored.
    #[must_use]
    pub fn with_cell_size(mut self, size: i32) -> Self {
        if (MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&size) {
            self.cell_size = size;
        }
        self
    }

    /// Cell size in pixels.
    #[must_use]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Cell under a pixel. Pixels left of or above the board map to
    /// negative cells.
    ///
    /// Pixel offsets saturate at the `i32` range.
    #[must_use]
    pub fn to_cell(&self, px: i32, py: i32) -> (i32, i32) {
        (
            px.saturating_sub(self.origin_x).div_euclid(self.cell_size),
            py.saturating_sub(self.origin_y).div_euclid(self.cell_size),
        )
    }

    /// Top-left pixel of a cell, saturating at the `i32` range.
    #[must_use]
    pub fn to_pixel(&self, x: i32, y: i32) -> (i32, i32) {
        (
            self.origin_x.saturating_add(x.saturating_mul(self.cell_size)),
            self.origin_y.saturating_add(y.saturating_mul(self.cell_size)),
        )
    }
}

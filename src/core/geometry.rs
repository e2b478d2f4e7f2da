//! Cell-space geometry: extents and rectangles.
//!
//! Both types are immutable `Copy` values. Moving or rotating a rectangle
//! produces a new value, so a rectangle held by a `Move` can never be
//! changed through another reference.
//!
//! Coordinates are signed because persisted data and cursor mapping can
//! produce values outside the map; the legality engine rejects them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl Extent {
    /// The zero extent.
    pub const EMPTY: Extent = Extent::new(0, 0);

    /// Create an extent.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cells covered. Zero when either side is non-positive.
    #[must_use]
    pub fn area(self) -> u32 {
        if self.is_degenerate() {
            0
        } else {
            self.width.unsigned_abs().saturating_mul(self.height.unsigned_abs())
        }
    }

    /// Whether either side is non-positive.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Swap width and height.
    #[must_use]
    pub const fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Width={},Height={}}}", self.width, self.height)
    }
}

/// An axis-aligned rectangle of cells, anchored at its top-left cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl Rect {
    /// The all-zero rectangle. Recorded for skipped moves.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an anchor and an extent.
    #[must_use]
    pub const fn at(x: i32, y: i32, extent: Extent) -> Self {
        Self::new(x, y, extent.width, extent.height)
    }

    /// Size of this rectangle.
    #[must_use]
    pub const fn extent(self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Number of cells covered.
    #[must_use]
    pub fn area(self) -> u32 {
        self.extent().area()
    }

    /// Whether the rectangle covers no cells.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.extent().is_degenerate()
    }

    /// One past the rightmost column.
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom row.
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Same size, new anchor.
    #[must_use]
    pub const fn with_position(self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Same anchor, new size.
    #[must_use]
    pub const fn with_extent(self, extent: Extent) -> Self {
        Self::at(self.x, self.y, extent)
    }

    /// Same anchor, width and height swapped.
    #[must_use]
    pub const fn rotated(self) -> Self {
        self.with_extent(self.extent().transposed())
    }

    /// Whether the two rectangles share at least one cell.
    #[must_use]
    pub fn intersects(self, other: Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Iterate over covered cells, column by column.
    ///
    /// Cells whose coordinates would overflow `i32` are skipped.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        let (width, height) = if self.is_degenerate() {
            (0, 0)
        } else {
            (self.width, self.height)
        };
        (0..width)
            .filter_map(move |dx| self.x.checked_add(dx))
            .flat_map(move |x| {
                (0..height)
                    .filter_map(move |dy| self.y.checked_add(dy))
                    .map(move |y| (x, y))
            })
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{X={},Y={},Width={},Height={}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_area() {
        assert_eq!(Extent::new(3, 4).area(), 12);
        assert_eq!(Extent::new(0, 4).area(), 0);
        assert_eq!(Extent::new(-2, 4).area(), 0);
        assert!(Extent::EMPTY.is_degenerate());
    }

    #[test]
    fn test_rect_rotation_builds_new_value() {
        let rect = Rect::new(2, 3, 4, 1);
        let rotated = rect.rotated();

        assert_eq!(rotated, Rect::new(2, 3, 1, 4));
        assert_eq!(rect, Rect::new(2, 3, 4, 1));
    }

    #[test]
    fn test_rect_with_position_keeps_size() {
        let rect = Rect::new(0, 0, 2, 5).with_position(7, 8);
        assert_eq!(rect, Rect::new(7, 8, 2, 5));
        assert_eq!(rect.right(), 9);
        assert_eq!(rect.bottom(), 13);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 3, 3);

        assert!(a.intersects(Rect::new(2, 2, 3, 3)));
        // Edge-touching is not overlap
        assert!(!a.intersects(Rect::new(3, 0, 2, 2)));
        assert!(!a.intersects(Rect::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_rect_cells() {
        let cells: Vec<_> = Rect::new(1, 2, 2, 2).cells().collect();
        assert_eq!(cells, vec![(1, 2), (1, 3), (2, 2), (2, 3)]);

        assert_eq!(Rect::new(1, 1, -1, 3).cells().count(), 0);
    }

    #[test]
    fn test_rect_near_i32_max() {
        let rect = Rect::new(i32::MAX, i32::MAX - 1, 2, 3);
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(cells, vec![(i32::MAX, i32::MAX - 1), (i32::MAX, i32::MAX)]);

        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.bottom(), i32::MAX);
        assert!(!rect.intersects(Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "{X=1,Y=2,Width=3,Height=4}");
        assert_eq!(Extent::new(20, 30).to_string(), "{Width=20,Height=30}");
    }

    #[test]
    fn test_rect_serialization() {
        let rect = Rect::new(4, 5, 6, 1);
        let json = serde_json::to_string(&rect).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, deserialized);
    }
}

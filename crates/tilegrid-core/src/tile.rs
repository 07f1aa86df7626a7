//! The [`Tile`] type and the [`TileGrid`] draw surface.
//!
//! A `TileGrid` is the owned buffer a model draws into each tick. The
//! application loop keeps two of them and ships only the difference between
//! consecutive draws to the driver as a [`Frame`].

use crate::color::Color;
use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A single colored square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub color: Color,
}

impl Tile {
    /// Create a tile of the given colour.
    #[inline]
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// An owned `width × height` buffer of [`Tile`]s, row-major.
#[derive(Clone, Debug)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
}

impl TileGrid {
    /// Create a grid of the given dimensions filled with default tiles.
    /// Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            tiles: vec![Tile::default(); (w as usize) * (h as usize)],
            width: w,
            height: h,
        }
    }

    /// The bounding range of the grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// Read the tile at `p`. Returns `Tile::default()` outside bounds.
    pub fn at(&self, p: Point) -> Tile {
        self.idx(p).map(|i| self.tiles[i]).unwrap_or_default()
    }

    /// Set the tile at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = tile;
        }
    }

    /// Fill every tile in the grid.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    /// Copy all tiles from `src`. Both grids must have the same dimensions;
    /// mismatched regions are ignored.
    pub fn copy_from(&mut self, src: &TileGrid) {
        if self.width == src.width && self.height == src.height {
            self.tiles.copy_from_slice(&src.tiles);
            return;
        }
        for p in self.bounds().iter() {
            if src.contains(p) {
                let tile = src.at(p);
                self.set(p, tile);
            }
        }
    }

    /// Row-major iterator over `(Point, Tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds().iter().map(move |p| (p, self.at(p)))
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single tile that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub tile: Tile,
    pub pos: Point,
}

/// A set of tile changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
    /// Milliseconds since the application loop started.
    pub time_ms: u64,
}

/// Compute the difference between two same-sized grids.
///
/// Returns a [`Frame`] containing only the tiles that differ, in row-major
/// order.
pub fn compute_frame(prev: &TileGrid, curr: &TileGrid, time_ms: u64) -> Frame {
    let bounds = curr.bounds();
    let mut cells = Vec::new();
    for p in bounds.iter() {
        let pc = prev.at(p);
        let cc = curr.at(p);
        if pc != cc {
            cells.push(FrameCell { tile: cc, pos: p });
        }
    }
    Frame {
        cells,
        width: bounds.width(),
        height: bounds.height(),
        time_ms,
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn frame_cell_round_trip() {
        let fc = FrameCell {
            pos: Point::new(3, 7),
            tile: Tile::new(Color::from_rgb(89, 94, 118)),
        };
        let json = serde_json::to_string(&fc).unwrap();
        let back: FrameCell = serde_json::from_str(&json).unwrap();
        assert_eq!(fc, back);
    }

    #[test]
    fn frame_round_trip() {
        let frame = Frame {
            cells: vec![FrameCell {
                pos: Point::new(1, 2),
                tile: Tile::new(Color::from_rgb(1, 2, 3)),
            }],
            width: 25,
            height: 25,
            time_ms: 99,
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cells, frame.cells);
        assert_eq!((back.width, back.height, back.time_ms), (25, 25, 99));
    }
}

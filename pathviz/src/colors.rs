//! Color palette: a dark board with a light trail.
//!
//! Walls share the grid-line color, so painted cells read as holes in the
//! board rather than a third accent color.

use tilegrid_core::Color;

/// Grid lines and window background.
pub const GRID: Color = Color::from_rgb(19, 19, 26);
/// An untouched cell.
pub const BOX: Color = Color::from_rgb(30, 33, 45);

/// Cell waiting in the frontier.
pub const QUEUED: Color = Color::from_rgb(89, 94, 118);
/// Cell already expanded.
pub const VISITED: Color = Color::from_rgb(127, 152, 188);
/// Cell on the final path.
pub const PATH: Color = Color::from_rgb(198, 201, 208);

/// The start cell.
pub const START: Color = Color::from_rgb(240, 240, 240);
/// A painted wall.
pub const WALL: Color = GRID;
/// The target cell.
pub const TARGET: Color = Color::from_rgb(240, 240, 240);

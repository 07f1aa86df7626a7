//! **tilegrid-core** — frame-driven colored-tile grid applications (core
//! types).
//!
//! This crate provides the foundational types shared across the *tilegrid*
//! ecosystem: geometry primitives, colored tiles, an owned diff-friendly tile
//! grid, input messages, frame recording, and the tick-based application
//! loop.

pub mod app;
pub mod color;
pub mod geom;
pub mod messages;
pub mod recording;
pub mod tile;

pub use app::{App, AppConfig, AppRunner, Context, Driver, Effect, EventLoopDriver, Model};
pub use color::Color;
pub use geom::{Point, Range};
pub use messages::{Key, ModMask, MouseAction, Msg};
pub use recording::{FrameDecoder, FrameEncoder};
pub use tile::{Frame, FrameCell, Tile, TileGrid, compute_frame};

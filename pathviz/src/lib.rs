//! Pathviz — an interactive breadth-first shortest-path visualizer.
//!
//! Paint walls with the left button, drop the target with the right button,
//! press space to watch the search expand from the top-left corner one cell
//! per frame. `r` resets, `q` or escape quits.

pub mod colors;
pub mod config;
pub mod model;

pub use config::{Config, ConfigError};
pub use model::{Phase, TITLE, VizModel};

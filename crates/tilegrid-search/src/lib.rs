//! **tilegrid-search** — board arena and incremental breadth-first traversal.
//!
//! [`Board`] holds the cells of an interactive grid search: role flags
//! (start, wall, target), traversal flags (queued, visited, predecessor),
//! and precomputed 4-way adjacency, all referenced by index. [`Traversal`]
//! expands the search one cell per call so the caller can animate it.

pub mod board;
pub mod traversal;

pub use board::{Board, BoardError, Cell, CellId};
pub use traversal::{SearchState, Traversal};

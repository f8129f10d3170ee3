//! Conway's Game of Life (B3/S23) on a fixed grid, with per-cell lifecycle
//! colors and an incrementally maintained neighbor-count cache.

pub mod bloomlife;
pub use bloomlife::{Evaluator, LifeGrid, LifeGridConfig, Palette};

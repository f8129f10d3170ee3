//! Lifecycle-tracking engine internals and public API.

mod active;
mod counts;
mod engine;
mod error;
mod grid;
mod lifecycle;
mod palette;
mod rules;

pub use counts::{Flip, NeighborCounts};
pub use engine::{EVALUATOR_ENV, Evaluator, LifeGrid, LifeGridConfig};
pub use error::{LifeError, Violation};
pub use grid::{Bounds, Coord, Grid};
pub use lifecycle::{Lifecycle, LifecycleSets};
pub use palette::{Palette, Redraw, Rgb};

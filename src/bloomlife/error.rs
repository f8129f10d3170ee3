//! Error type shared by the grid constructors, layout loading and cell edits.
//!
//! A tick has no recoverable failure modes. The only errors are caller
//! mistakes at the edges (bad dimensions, bad coordinates, mismatched layouts)
//! and invariant checks requested explicitly through
//! [`LifeGrid::check_invariants`](super::LifeGrid::check_invariants).

use thiserror::Error;

use super::grid::{Bounds, Coord};

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifeError {
    /// Rows and columns must both be at least 1.
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    ZeroDimension { rows: u32, cols: u32 },
    /// A cell buffer does not hold exactly `rows * cols` entries.
    #[error("cell buffer holds {found} cells but the grid needs {expected}")]
    LengthMismatch { expected: usize, found: usize },
    /// A layout was built for a different grid shape.
    #[error("layout is {found} but the grid is {expected}")]
    ShapeMismatch { expected: Bounds, found: Bounds },
    /// A coordinate lies outside `[0, rows) x [0, cols)`.
    #[error("cell {coord} is outside the {bounds} grid")]
    OutOfBounds { coord: Coord, bounds: Bounds },
    /// An evaluator name that `Evaluator::from_str` does not recognise.
    #[error("unknown evaluator: {name} (expected full, window or cached)")]
    UnknownEvaluator { name: String },
    /// The engine state broke one of its structural invariants.
    #[error("invariant violated at {coord}: {violation}")]
    InvariantViolation { coord: Coord, violation: Violation },
}

/// Which invariant an [`LifeError::InvariantViolation`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("coordinate is tracked in more than one lifecycle set")]
    Overlap,
    #[error("cell is alive but not tracked as new or survivor")]
    UntrackedAlive,
    #[error("cell is tracked as new or survivor but is not alive")]
    TrackedDead,
    #[error("cached neighbor count {cached} differs from actual {actual}")]
    StaleCount { cached: u8, actual: u8 },
}

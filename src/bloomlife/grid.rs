//! Dense liveness grid and bounds-checked neighborhood iteration.
//!
//! The grid is not toroidal: every neighborhood is clipped to
//! `[0, rows) x [0, cols)`, so edge cells have 5 neighbors and corners 3.

use std::fmt;

use super::error::LifeError;

/// A cell coordinate, 0-indexed from the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Grid dimensions. Both sides are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    rows: u32,
    cols: u32,
}

impl Bounds {
    pub fn new(rows: u32, cols: u32) -> Result<Self, LifeError> {
        if rows == 0 || cols == 0 {
            return Err(LifeError::ZeroDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    #[inline(always)]
    pub fn rows(self) -> u32 {
        self.rows
    }

    #[inline(always)]
    pub fn cols(self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    #[inline(always)]
    pub fn len(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline(always)]
    pub fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Returns `coord` unchanged if it lies inside the grid.
    pub fn check(self, coord: Coord) -> Result<Coord, LifeError> {
        if self.contains(coord) {
            Ok(coord)
        } else {
            Err(LifeError::OutOfBounds {
                coord,
                bounds: self,
            })
        }
    }

    /// Row-major index of an in-bounds coordinate.
    #[inline(always)]
    pub fn index(self, coord: Coord) -> usize {
        debug_assert!(self.contains(coord), "{coord} outside {self}");
        coord.row as usize * self.cols as usize + coord.col as usize
    }

    #[inline(always)]
    pub fn coord(self, index: usize) -> Coord {
        debug_assert!(index < self.len());
        let cols = self.cols as usize;
        Coord::new((index / cols) as u32, (index % cols) as u32)
    }

    /// All coordinates in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Coord> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }

    /// The clipped 3x3 window centred on `coord`, origin included.
    #[inline]
    pub fn window(self, coord: Coord) -> impl Iterator<Item = Coord> {
        let row_lo = coord.row.saturating_sub(1);
        let row_hi = (coord.row + 1).min(self.rows - 1);
        let col_lo = coord.col.saturating_sub(1);
        let col_hi = (coord.col + 1).min(self.cols - 1);
        (row_lo..=row_hi).flat_map(move |row| (col_lo..=col_hi).map(move |col| Coord::new(row, col)))
    }

    /// The up-to-8 clipped neighbors of `coord`, origin excluded.
    #[inline]
    pub fn neighbors(self, coord: Coord) -> impl Iterator<Item = Coord> {
        self.window(coord).filter(move |&n| n != coord)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Dense `rows x cols` liveness array, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    bounds: Bounds,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-dead grid.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            cells: vec![false; bounds.len()],
        }
    }

    pub fn from_cells(bounds: Bounds, cells: Vec<bool>) -> Result<Self, LifeError> {
        if cells.len() != bounds.len() {
            return Err(LifeError::LengthMismatch {
                expected: bounds.len(),
                found: cells.len(),
            });
        }
        Ok(Self { bounds, cells })
    }

    /// A grid with exactly the given cells alive.
    pub fn from_alive<I>(bounds: Bounds, alive: I) -> Result<Self, LifeError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut grid = Self::new(bounds);
        for coord in alive {
            grid.set(bounds.check(coord)?, true);
        }
        Ok(grid)
    }

    #[inline(always)]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline(always)]
    pub fn rows(&self) -> u32 {
        self.bounds.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> u32 {
        self.bounds.cols
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, coord: Coord) -> bool {
        self.cells[self.bounds.index(coord)]
    }

    #[inline(always)]
    pub fn set(&mut self, coord: Coord, alive: bool) {
        let i = self.bounds.index(coord);
        self.cells[i] = alive;
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Alive neighbors of `coord`, summed over the clipped 3x3 window.
    #[inline]
    pub fn window_sum(&self, coord: Coord) -> u8 {
        let mut sum = 0u8;
        for n in self.bounds.neighbors(coord) {
            sum += self.get(n) as u8;
        }
        sum
    }

    pub fn for_each_alive<F: FnMut(Coord)>(&self, mut f: F) {
        for (i, &alive) in self.cells.iter().enumerate() {
            if alive {
                f(self.bounds.coord(i));
            }
        }
    }

    /// OR `other` into `self`. Shapes must already match.
    pub(crate) fn union_with(&mut self, other: &Grid) {
        debug_assert_eq!(self.bounds, other.bounds);
        for (dst, &src) in self.cells.iter_mut().zip(&other.cells) {
            *dst |= src;
        }
    }
}

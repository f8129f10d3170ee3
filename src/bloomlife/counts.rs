//! Incrementally maintained neighbor counts.
//!
//! At every tick boundary `counts[c]` equals the number of alive cells in the
//! clipped 8-neighborhood of `c`. During a tick the cache is read only; the
//! flips collected by the evaluation pass are applied afterwards in one batch.

use super::grid::{Bounds, Coord, Grid};

/// A cell whose liveness changed: +1 when it came alive, -1 when it died.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flip {
    pub coord: Coord,
    pub delta: i8,
}

impl Flip {
    #[inline(always)]
    pub fn new(coord: Coord, now_alive: bool) -> Self {
        Self {
            coord,
            delta: if now_alive { 1 } else { -1 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborCounts {
    bounds: Bounds,
    counts: Vec<u8>,
}

impl NeighborCounts {
    /// All-zero counts, matching an all-dead grid.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            counts: vec![0; bounds.len()],
        }
    }

    /// Seed from a grid by propagating +1 from every alive cell.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut counts = Self::new(grid.bounds());
        grid.for_each_alive(|coord| counts.apply(coord, 1));
        counts
    }

    #[inline(always)]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline(always)]
    pub fn get(&self, coord: Coord) -> u8 {
        self.counts[self.bounds.index(coord)]
    }

    /// Add `delta` to every in-bounds neighbor of `coord`, skipping `coord` itself.
    #[inline]
    pub fn apply(&mut self, coord: Coord, delta: i8) {
        for n in self.bounds.neighbors(coord) {
            let slot = &mut self.counts[self.bounds.index(n)];
            *slot = slot.wrapping_add_signed(delta);
            debug_assert!(*slot <= 8, "neighbor count at {n} out of range");
        }
    }

    /// Apply a tick's worth of flips. Must run after the evaluation pass.
    pub fn apply_flips(&mut self, flips: &[Flip]) {
        for flip in flips {
            self.apply(flip.coord, flip.delta);
        }
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    /// First cell whose cached count disagrees with a brute-force window sum,
    /// as `(coord, cached, actual)`.
    pub fn mismatch(&self, grid: &Grid) -> Option<(Coord, u8, u8)> {
        debug_assert_eq!(self.bounds, grid.bounds());
        self.bounds.iter().find_map(|coord| {
            let cached = self.get(coord);
            let actual = grid.window_sum(coord);
            (cached != actual).then_some((coord, cached, actual))
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::{Flip, NeighborCounts};
    use crate::bloomlife::{Bounds, Coord, Grid};

    #[test]
    fn seeded_counts_match_window_sums() {
        let bounds = Bounds::new(17, 23).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0_FFEE);
        let cells = (0..bounds.len()).map(|_| rng.random::<f64>() < 0.4).collect();
        let grid = Grid::from_cells(bounds, cells).unwrap();

        let counts = NeighborCounts::from_grid(&grid);
        assert_eq!(counts.mismatch(&grid), None);
    }

    #[test]
    fn flips_patch_neighbors_but_not_origin() {
        let bounds = Bounds::new(3, 3).unwrap();
        let mut grid = Grid::new(bounds);
        let mut counts = NeighborCounts::new(bounds);

        let centre = Coord::new(1, 1);
        grid.set(centre, true);
        counts.apply_flips(&[Flip::new(centre, true)]);
        assert_eq!(counts.get(centre), 0);
        assert_eq!(counts.get(Coord::new(0, 0)), 1);
        assert_eq!(counts.mismatch(&grid), None);

        let corner = Coord::new(0, 0);
        grid.set(corner, true);
        grid.set(centre, false);
        counts.apply_flips(&[Flip::new(corner, true), Flip::new(centre, false)]);
        assert_eq!(counts.get(centre), 1);
        assert_eq!(counts.get(Coord::new(2, 2)), 0);
        assert_eq!(counts.mismatch(&grid), None);
    }

    #[test]
    fn mismatch_reports_stale_cells() {
        let bounds = Bounds::new(4, 4).unwrap();
        let grid = Grid::from_alive(bounds, [Coord::new(2, 2)]).unwrap();
        let counts = NeighborCounts::new(bounds);
        let (coord, cached, actual) = counts.mismatch(&grid).unwrap();
        assert_eq!(coord, Coord::new(1, 1));
        assert_eq!((cached, actual), (0, 1));
    }
}

//! Active-region derivation.
//!
//! The active region is rebuilt each tick from the tracked lifecycle sets: a
//! cell is active if it is tracked or is an in-bounds neighbor of a tracked
//! cell. This is O(tracked * 9) instead of O(rows * cols). Cells outside the
//! region are background before and after the tick, because a birth needs an
//! alive neighbor and every alive cell is tracked.
//!
//! Dedup uses one stamp per grid cell. A cell is already in the region when
//! its stamp equals the current tick's stamp, so starting a new region only
//! bumps a counter. The buffer is swept only when the counter wraps.

use super::grid::{Bounds, Coord};
use super::lifecycle::LifecycleSets;

#[derive(Default)]
pub struct ActiveRegion {
    stamps: Vec<u32>,
    stamp: u32,
    seeds: Vec<Coord>,
    cells: Vec<Coord>,
}

impl ActiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh region over `bounds` without touching the stamp buffer.
    fn begin(&mut self, bounds: Bounds) {
        if self.stamps.len() != bounds.len() {
            self.stamps.clear();
            self.stamps.resize(bounds.len(), 0);
            self.stamp = 0;
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.stamps.fill(0);
            self.stamp = 1;
        }
    }

    /// Rebuild from the tracked cells. Seeds are visited in sorted order, so
    /// the region order is deterministic for a given lifecycle state.
    pub fn rebuild(&mut self, sets: &LifecycleSets, bounds: Bounds) {
        self.cells.clear();
        self.seeds.clear();
        self.seeds.extend(sets.tracked());
        if self.seeds.is_empty() {
            return;
        }
        self.seeds.sort_unstable();

        self.begin(bounds);
        self.cells.reserve(self.seeds.len() * 4);
        for &seed in &self.seeds {
            for coord in bounds.window(seed) {
                let slot = &mut self.stamps[bounds.index(coord)];
                if *slot != self.stamp {
                    *slot = self.stamp;
                    self.cells.push(coord);
                }
            }
        }
    }

    /// Every cell of the grid, row-major. Used by the full-scan evaluator.
    pub fn rebuild_full(&mut self, bounds: Bounds) {
        self.cells.clear();
        self.cells.extend(bounds.iter());
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[inline(always)]
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::ActiveRegion;
    use crate::bloomlife::{Bounds, Coord, LifecycleSets};

    #[test]
    fn quiescent_sets_give_an_empty_region() {
        let mut region = ActiveRegion::new();
        region.rebuild(&LifecycleSets::new(), Bounds::new(8, 8).unwrap());
        assert!(region.is_empty());
    }

    #[test]
    fn region_is_tracked_cells_plus_neighborhood_without_duplicates() {
        let bounds = Bounds::new(10, 10).unwrap();
        let mut sets = LifecycleSets::new();
        sets.mark_new(Coord::new(4, 4));
        sets.mark_survivor(Coord::new(4, 5));
        sets.mark_dead(Coord::new(8, 1));

        let mut region = ActiveRegion::new();
        region.rebuild(&sets, bounds);

        let unique: HashSet<Coord> = region.cells().iter().copied().collect();
        assert_eq!(unique.len(), region.len());
        // 3x4 block around the two adjacent cells, plus a 3x3 block.
        assert_eq!(region.len(), 12 + 9);
        assert!(unique.contains(&Coord::new(3, 6)));
        assert!(unique.contains(&Coord::new(9, 0)));
        assert!(!unique.contains(&Coord::new(2, 4)));
    }

    #[test]
    fn region_is_clipped_at_the_corner() {
        let bounds = Bounds::new(5, 5).unwrap();
        let mut sets = LifecycleSets::new();
        sets.mark_dead(Coord::new(0, 0));

        let mut region = ActiveRegion::new();
        region.rebuild(&sets, bounds);
        assert_eq!(region.len(), 4);

        region.rebuild_full(bounds);
        assert_eq!(region.len(), 25);
    }

    #[test]
    fn consecutive_rebuilds_forget_the_previous_region() {
        let bounds = Bounds::new(12, 12).unwrap();
        let mut region = ActiveRegion::new();

        let mut first = LifecycleSets::new();
        first.mark_new(Coord::new(2, 2));
        region.rebuild(&first, bounds);
        assert_eq!(region.len(), 9);

        let mut second = LifecycleSets::new();
        second.mark_new(Coord::new(2, 2));
        second.mark_survivor(Coord::new(9, 9));
        region.rebuild(&second, bounds);
        let unique: HashSet<Coord> = region.cells().iter().copied().collect();
        assert_eq!(region.len(), 18);
        assert_eq!(unique.len(), 18);
        assert!(unique.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn stamp_wraparound_resets_the_buffer() {
        let bounds = Bounds::new(6, 6).unwrap();
        let mut sets = LifecycleSets::new();
        sets.mark_new(Coord::new(3, 3));

        let mut region = ActiveRegion::new();
        region.rebuild(&sets, bounds);
        region.stamp = u32::MAX;
        region.rebuild(&sets, bounds);
        assert_eq!(region.stamp, 1);
        assert_eq!(region.len(), 9);
        region.rebuild(&sets, bounds);
        assert_eq!(region.len(), 9);
    }

    #[test]
    fn region_follows_a_change_of_bounds() {
        let mut sets = LifecycleSets::new();
        sets.mark_dead(Coord::new(1, 1));

        let mut region = ActiveRegion::new();
        region.rebuild(&sets, Bounds::new(3, 3).unwrap());
        assert_eq!(region.len(), 9);
        region.rebuild(&sets, Bounds::new(2, 20).unwrap());
        assert_eq!(region.len(), 6);
    }
}

//! Lifecycle tracking for non-background cells.
//!
//! Only `New`, `Survivor` and `Dead` cells are stored. `Empty` is the
//! absence from all three sets, so a mostly-background grid costs nothing
//! here. Every `mark_*` call removes the coordinate from the other two sets,
//! which keeps the sets pairwise disjoint by construction.

use std::collections::{HashMap, HashSet};

use super::grid::Coord;

/// Visual and tracking state of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Background: not alive and not recently alive.
    #[default]
    Empty,
    /// Became alive this tick.
    New,
    /// Was alive and stayed alive.
    Survivor,
    /// Died this tick. Kept for one tick as a visual echo, never alive.
    Dead,
}

impl Lifecycle {
    /// Whether a cell in this state counts towards its neighbors.
    #[inline(always)]
    pub fn is_alive(self) -> bool {
        matches!(self, Lifecycle::New | Lifecycle::Survivor)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleSets {
    new: HashSet<Coord>,
    survivor: HashSet<Coord>,
    dead: HashSet<Coord>,
    /// Consecutive survivor ticks per survivor, 0 on the first.
    survivor_ages: HashMap<Coord, u32>,
}

impl LifecycleSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, coord: Coord) -> Lifecycle {
        if self.new.contains(&coord) {
            Lifecycle::New
        } else if self.survivor.contains(&coord) {
            Lifecycle::Survivor
        } else if self.dead.contains(&coord) {
            Lifecycle::Dead
        } else {
            Lifecycle::Empty
        }
    }

    #[inline]
    pub fn mark_new(&mut self, coord: Coord) {
        self.new.insert(coord);
        self.survivor.remove(&coord);
        self.dead.remove(&coord);
    }

    #[inline]
    pub fn mark_survivor(&mut self, coord: Coord) {
        self.survivor.insert(coord);
        self.new.remove(&coord);
        self.dead.remove(&coord);
    }

    #[inline]
    pub fn mark_dead(&mut self, coord: Coord) {
        self.dead.insert(coord);
        self.new.remove(&coord);
        self.survivor.remove(&coord);
    }

    /// Drop a `Dead` marker so the cell reverts to `Empty`.
    /// Returns `true` if the cell was marked dead.
    #[inline]
    pub fn demote(&mut self, coord: Coord) -> bool {
        self.dead.remove(&coord)
    }

    /// Remove a coordinate from every set, survivor age included.
    pub fn forget(&mut self, coord: Coord) {
        self.new.remove(&coord);
        self.survivor.remove(&coord);
        self.dead.remove(&coord);
        self.survivor_ages.remove(&coord);
    }

    pub fn clear(&mut self) {
        self.new.clear();
        self.survivor.clear();
        self.dead.clear();
        self.survivor_ages.clear();
    }

    pub fn new_cells(&self) -> &HashSet<Coord> {
        &self.new
    }

    pub fn survivors(&self) -> &HashSet<Coord> {
        &self.survivor
    }

    pub fn dead_cells(&self) -> &HashSet<Coord> {
        &self.dead
    }

    /// Every tracked coordinate: `new ∪ survivor ∪ dead`.
    pub fn tracked(&self) -> impl Iterator<Item = Coord> + '_ {
        self.new
            .iter()
            .chain(&self.survivor)
            .chain(&self.dead)
            .copied()
    }

    pub fn tracked_len(&self) -> usize {
        self.new.len() + self.survivor.len() + self.dead.len()
    }

    /// No tracked cells: the next tick evaluates nothing.
    pub fn is_quiescent(&self) -> bool {
        self.tracked_len() == 0
    }

    /// Number of alive cells, i.e. `|new| + |survivor|`.
    pub fn alive_len(&self) -> usize {
        self.new.len() + self.survivor.len()
    }

    /// First coordinate found in two sets, if any.
    pub fn overlap(&self) -> Option<Coord> {
        self.new
            .iter()
            .find(|&c| self.survivor.contains(c) || self.dead.contains(c))
            .or_else(|| self.survivor.iter().find(|&c| self.dead.contains(c)))
            .copied()
    }

    pub fn survivor_age(&self, coord: Coord) -> Option<u32> {
        self.survivor_ages.get(&coord).copied()
    }

    /// Bring survivor ages in line with the survivor set after a tick.
    pub(crate) fn refresh_survivor_ages(&mut self) {
        let survivor = &self.survivor;
        self.survivor_ages.retain(|coord, _| survivor.contains(coord));
        for &coord in &self.survivor {
            self.survivor_ages
                .entry(coord)
                .and_modify(|age| *age += 1)
                .or_insert(0);
        }
    }

    /// Survivors of at least `min_age` ticks, sorted.
    pub(crate) fn survivors_aged(&self, min_age: u32) -> Vec<Coord> {
        let mut out: Vec<Coord> = self
            .survivor_ages
            .iter()
            .filter(|&(_, &age)| age >= min_age)
            .map(|(&coord, _)| coord)
            .collect();
        out.sort_unstable();
        out
    }

    pub(crate) fn swap_new_and_dead(&mut self) {
        std::mem::swap(&mut self.new, &mut self.dead);
    }
}

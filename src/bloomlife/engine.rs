//! The tick engine and its public API.
//!
//! One tick:
//! 1. derive the active region from the lifecycle sets (or take the whole
//!    grid for [`Evaluator::FullScan`]),
//! 2. classify every region cell against B3/S23 using either a window sum or
//!    the cached neighbor count, writing the next generation into a second
//!    buffer and collecting flips,
//! 3. swap the buffers,
//! 4. patch the count cache with the collected flips,
//! 5. hand back one redraw entry per evaluated cell.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use super::active::ActiveRegion;
use super::counts::{Flip, NeighborCounts};
use super::error::{LifeError, Violation};
use super::grid::{Bounds, Coord, Grid};
use super::lifecycle::{Lifecycle, LifecycleSets};
use super::palette::{Palette, Redraw};
use super::rules::RuleTable;

/// Environment variable consulted when no evaluator is configured.
pub const EVALUATOR_ENV: &str = "BLOOMLIFE_EVALUATOR";

/// How a tick finds the cells to evaluate and their neighbor counts.
///
/// All three produce identical grids and lifecycle sets; they differ only in
/// cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Evaluator {
    /// Evaluate every cell, summing each 3x3 window. Like the others it
    /// skips the pass entirely once nothing is tracked.
    FullScan,
    /// Evaluate the active region, summing each 3x3 window.
    ActiveWindow,
    /// Evaluate the active region, reading the incremental count cache.
    #[default]
    ActiveCached,
}

impl Evaluator {
    pub const ALL: [Evaluator; 3] = [
        Evaluator::FullScan,
        Evaluator::ActiveWindow,
        Evaluator::ActiveCached,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Evaluator::FullScan => "full",
            Evaluator::ActiveWindow => "window",
            Evaluator::ActiveCached => "cached",
        }
    }

    #[inline(always)]
    fn uses_cache(self) -> bool {
        self == Evaluator::ActiveCached
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Evaluator {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "fullscan" | "naive" => Ok(Evaluator::FullScan),
            "window" | "active" => Ok(Evaluator::ActiveWindow),
            "cached" | "counts" => Ok(Evaluator::ActiveCached),
            other => Err(LifeError::UnknownEvaluator {
                name: other.to_string(),
            }),
        }
    }
}

/// Configuration for a [`LifeGrid`].
///
/// Use `LifeGridConfig::default()` for the default policy, or set individual
/// knobs via the builder methods.
#[derive(Clone, Debug, Default)]
pub struct LifeGridConfig {
    /// `None` means `$BLOOMLIFE_EVALUATOR`, else [`Evaluator::ActiveCached`].
    pub evaluator: Option<Evaluator>,
    /// Run [`LifeGrid::check_invariants`] after every tick and panic on failure.
    /// `None` means on in debug builds only.
    pub verify_ticks: Option<bool>,
}

impl LifeGridConfig {
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn verify_ticks(mut self, verify: bool) -> Self {
        self.verify_ticks = Some(verify);
        self
    }
}

fn resolve_evaluator(config: &LifeGridConfig) -> Evaluator {
    if let Some(evaluator) = config.evaluator {
        return evaluator;
    }
    match std::env::var(EVALUATOR_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            warn!(%err, var = EVALUATOR_ENV, "ignoring evaluator override");
            Evaluator::default()
        }),
        Err(_) => Evaluator::default(),
    }
}

pub struct LifeGrid {
    grid: Grid,
    /// Next-generation buffer. Between ticks every alive cell in it lies
    /// inside the next active region unless `next_stale` is set.
    next: Grid,
    next_stale: bool,
    lifecycle: LifecycleSets,
    /// Present only for [`Evaluator::ActiveCached`].
    counts: Option<NeighborCounts>,
    evaluator: Evaluator,
    verify_ticks: bool,
    rules: RuleTable,
    active: ActiveRegion,
    flips: Vec<Flip>,
    redraw: Vec<Redraw>,
    generation: u64,
}

impl LifeGrid {
    /// An all-background grid with the default configuration.
    pub fn new(rows: u32, cols: u32) -> Result<Self, LifeError> {
        Self::with_config(rows, cols, LifeGridConfig::default())
    }

    pub fn with_config(rows: u32, cols: u32, config: LifeGridConfig) -> Result<Self, LifeError> {
        let bounds = Bounds::new(rows, cols)?;
        let evaluator = resolve_evaluator(&config);
        let verify_ticks = config.verify_ticks.unwrap_or(cfg!(debug_assertions));
        debug!(%bounds, %evaluator, verify_ticks, "creating life grid");

        Ok(Self {
            grid: Grid::new(bounds),
            next: Grid::new(bounds),
            next_stale: false,
            lifecycle: LifecycleSets::new(),
            counts: evaluator.uses_cache().then(|| NeighborCounts::new(bounds)),
            evaluator,
            verify_ticks,
            rules: RuleTable::new(),
            active: ActiveRegion::new(),
            flips: Vec::new(),
            redraw: Vec::new(),
            generation: 0,
        })
    }

    /// Advance one generation and return the cells to repaint.
    ///
    /// Every evaluated cell gets exactly one entry. A quiescent grid evaluates
    /// nothing and returns an empty slice.
    pub fn advance(&mut self, palette: &Palette) -> &[Redraw] {
        self.redraw.clear();
        self.flips.clear();

        let bounds = self.grid.bounds();
        match self.evaluator {
            _ if self.lifecycle.is_quiescent() => self.active.clear(),
            Evaluator::FullScan => self.active.rebuild_full(bounds),
            Evaluator::ActiveWindow | Evaluator::ActiveCached => {
                self.active.rebuild(&self.lifecycle, bounds)
            }
        }

        if self.active.is_empty() {
            trace!(generation = self.generation, "quiescent tick");
            self.generation += 1;
            return &self.redraw;
        }

        if self.next_stale {
            self.next.clear();
            self.next_stale = false;
        }

        self.redraw.reserve(self.active.len());
        for &coord in self.active.cells() {
            let alive = self.grid.get(coord);
            let neighbors = match &self.counts {
                Some(counts) => counts.get(coord),
                None => self.grid.window_sum(coord),
            };
            let outcome = self.rules.lookup(alive, neighbors);

            self.next.set(coord, outcome.alive);
            if outcome.alive != alive {
                self.flips.push(Flip::new(coord, outcome.alive));
            }
            match outcome.class {
                Lifecycle::New => self.lifecycle.mark_new(coord),
                Lifecycle::Survivor => self.lifecycle.mark_survivor(coord),
                Lifecycle::Dead => self.lifecycle.mark_dead(coord),
                Lifecycle::Empty => {
                    self.lifecycle.demote(coord);
                }
            }
            self.redraw.push(Redraw {
                coord,
                color: palette.color_for(outcome.class),
            });
        }

        std::mem::swap(&mut self.grid, &mut self.next);
        if let Some(counts) = self.counts.as_mut() {
            counts.apply_flips(&self.flips);
        }
        self.lifecycle.refresh_survivor_ages();
        self.generation += 1;

        debug!(
            generation = self.generation,
            evaluated = self.active.len(),
            flips = self.flips.len(),
            population = self.population(),
            "tick"
        );

        if self.verify_ticks {
            if let Err(err) = self.check_invariants() {
                panic!("generation {} left the grid inconsistent: {err}", self.generation);
            }
        }

        &self.redraw
    }

    /// Advance `n` generations, discarding redraws.
    pub fn advance_n(&mut self, n: u64, palette: &Palette) {
        for _ in 0..n {
            self.advance(palette);
        }
    }

    /// Bring a cell to life as `New`. Returns `None` if it was already alive.
    pub fn resurrect_cell(
        &mut self,
        coord: Coord,
        palette: &Palette,
    ) -> Result<Option<Redraw>, LifeError> {
        let coord = self.grid.bounds().check(coord)?;
        if self.grid.get(coord) {
            return Ok(None);
        }
        self.set_alive(coord, true);
        self.lifecycle.mark_new(coord);
        debug!(%coord, "resurrected cell");
        Ok(Some(Redraw {
            coord,
            color: palette.new,
        }))
    }

    /// Kill a cell and drop it from tracking entirely.
    pub fn clear_cell(&mut self, coord: Coord, palette: &Palette) -> Result<Redraw, LifeError> {
        let coord = self.grid.bounds().check(coord)?;
        self.set_alive(coord, false);
        self.lifecycle.forget(coord);
        self.next_stale = true;
        debug!(%coord, "cleared cell");
        Ok(Redraw {
            coord,
            color: palette.background,
        })
    }

    /// Replace the grid wholesale. Every alive cell starts out `New` and the
    /// generation counter restarts at 0. Returns a redraw for every cell.
    pub fn load_layout(&mut self, layout: Grid, palette: &Palette) -> Result<&[Redraw], LifeError> {
        self.check_shape(layout.bounds())?;
        self.grid = layout;
        self.lifecycle.clear();
        self.grid.for_each_alive(|coord| self.lifecycle.mark_new(coord));
        self.rebuild_counts();
        self.next_stale = true;
        self.generation = 0;
        debug!(population = self.population(), "loaded layout");
        Ok(self.redraw_all(palette))
    }

    /// OR the alive cells of `layer` into the grid. Every alive cell becomes
    /// `New`. Returns a redraw for every cell.
    pub fn overlay(&mut self, layer: &Grid, palette: &Palette) -> Result<&[Redraw], LifeError> {
        self.check_shape(layer.bounds())?;
        self.grid.union_with(layer);
        let grid = &self.grid;
        let lifecycle = &mut self.lifecycle;
        grid.for_each_alive(|coord| {
            lifecycle.forget(coord);
            lifecycle.mark_new(coord);
        });
        self.rebuild_counts();
        self.next_stale = true;
        debug!(population = self.population(), "overlaid layout");
        Ok(self.redraw_all(palette))
    }

    /// Kill every survivor outright; they become `Empty`.
    pub fn wipe_survivors(&mut self, palette: &Palette) -> &[Redraw] {
        let mut survivors: Vec<Coord> = self.lifecycle.survivors().iter().copied().collect();
        survivors.sort_unstable();
        self.kill_and_forget(&survivors, palette)
    }

    /// Kill every survivor that has survived at least `min_age` ticks.
    pub fn purge_survivors(&mut self, min_age: u32, palette: &Palette) -> &[Redraw] {
        let stragglers = self.lifecycle.survivors_aged(min_age);
        self.kill_and_forget(&stragglers, palette)
    }

    /// Swap the `New` and `Dead` sets: dead markers come alive, new cells die.
    pub fn invert(&mut self, palette: &Palette) -> &[Redraw] {
        self.redraw.clear();
        self.lifecycle.swap_new_and_dead();

        let mut revived: Vec<Coord> = self.lifecycle.new_cells().iter().copied().collect();
        let mut killed: Vec<Coord> = self.lifecycle.dead_cells().iter().copied().collect();
        revived.sort_unstable();
        killed.sort_unstable();

        for &coord in &revived {
            self.set_alive(coord, true);
            self.redraw.push(Redraw {
                coord,
                color: palette.new,
            });
        }
        for &coord in &killed {
            self.set_alive(coord, false);
            self.redraw.push(Redraw {
                coord,
                color: palette.dead,
            });
        }
        self.next_stale = true;
        debug!(revived = revived.len(), killed = killed.len(), "inverted");
        &self.redraw
    }

    /// Back to an all-background grid at generation 0.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.next.clear();
        self.next_stale = false;
        self.lifecycle.clear();
        if let Some(counts) = self.counts.as_mut() {
            counts.reset();
        }
        self.generation = 0;
        debug!("reset");
    }

    /// Verify disjointness, grid/lifecycle agreement and, when cached, that
    /// every neighbor count matches a brute-force recount.
    pub fn check_invariants(&self) -> Result<(), LifeError> {
        let violation =
            |coord: Coord, violation: Violation| LifeError::InvariantViolation { coord, violation };

        if let Some(coord) = self.lifecycle.overlap() {
            return Err(violation(coord, Violation::Overlap));
        }
        for coord in self.grid.bounds().iter() {
            match (self.grid.get(coord), self.lifecycle.classify(coord).is_alive()) {
                (true, false) => return Err(violation(coord, Violation::UntrackedAlive)),
                (false, true) => return Err(violation(coord, Violation::TrackedDead)),
                _ => {}
            }
        }
        if let Some(counts) = &self.counts {
            if let Some((coord, cached, actual)) = counts.mismatch(&self.grid) {
                return Err(violation(coord, Violation::StaleCount { cached, actual }));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn lifecycle(&self) -> &LifecycleSets {
        &self.lifecycle
    }

    pub fn counts(&self) -> Option<&NeighborCounts> {
        self.counts.as_ref()
    }

    /// Cells evaluated by the most recent tick.
    pub fn active_region(&self) -> &[Coord] {
        self.active.cells()
    }

    pub fn classify(&self, coord: Coord) -> Lifecycle {
        self.lifecycle.classify(coord)
    }

    pub fn evaluator(&self) -> Evaluator {
        self.evaluator
    }

    pub fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Alive cells, read from the lifecycle sets in O(1).
    pub fn population(&self) -> usize {
        self.lifecycle.alive_len()
    }

    pub fn alive_percentage(&self) -> f64 {
        self.population() as f64 / self.grid.len() as f64 * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }

    fn check_shape(&self, found: Bounds) -> Result<(), LifeError> {
        let expected = self.grid.bounds();
        if expected != found {
            return Err(LifeError::ShapeMismatch { expected, found });
        }
        Ok(())
    }

    /// Set liveness, patching the count cache if it changed.
    fn set_alive(&mut self, coord: Coord, alive: bool) {
        if self.grid.get(coord) == alive {
            return;
        }
        self.grid.set(coord, alive);
        if let Some(counts) = self.counts.as_mut() {
            counts.apply(coord, if alive { 1 } else { -1 });
        }
    }

    fn rebuild_counts(&mut self) {
        if self.counts.is_some() {
            self.counts = Some(NeighborCounts::from_grid(&self.grid));
        }
    }

    fn kill_and_forget(&mut self, cells: &[Coord], palette: &Palette) -> &[Redraw] {
        self.redraw.clear();
        for &coord in cells {
            self.set_alive(coord, false);
            self.lifecycle.forget(coord);
            self.redraw.push(Redraw {
                coord,
                color: palette.background,
            });
        }
        self.next_stale = true;
        debug!(killed = cells.len(), "removed survivors");
        &self.redraw
    }

    fn redraw_all(&mut self, palette: &Palette) -> &[Redraw] {
        self.redraw.clear();
        for coord in self.grid.bounds().iter() {
            self.redraw.push(Redraw {
                coord,
                color: palette.color_for(self.lifecycle.classify(coord)),
            });
        }
        &self.redraw
    }
}

impl fmt::Debug for LifeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeGrid")
            .field("bounds", &self.grid.bounds())
            .field("evaluator", &self.evaluator)
            .field("generation", &self.generation)
            .field("population", &self.population())
            .field("tracked", &self.lifecycle.tracked_len())
            .finish()
    }
}

use std::collections::HashSet;

use bloom_life::bloomlife::{Bounds, Coord, Grid};
use bloom_life::{Evaluator, LifeGrid, LifeGridConfig, Palette};
use rand::RngCore;
use rand::SeedableRng;

fn random_layout(rows: u32, cols: u32, density: f64, seed: u64) -> Grid {
    let bounds = Bounds::new(rows, cols).expect("positive dimensions");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let cells = (0..bounds.len()).map(|_| rng.next_u64() <= threshold).collect();
    Grid::from_cells(bounds, cells).expect("matching length")
}

fn engine_with(layout: &Grid, evaluator: Evaluator) -> LifeGrid {
    let mut engine = LifeGrid::with_config(
        layout.rows(),
        layout.cols(),
        LifeGridConfig::default()
            .evaluator(evaluator)
            .verify_ticks(false),
    )
    .expect("valid dimensions");
    engine
        .load_layout(layout.clone(), &Palette::default())
        .expect("same shape");
    engine
}

/// Independent bounded B3/S23 stepper over a set of live cells.
fn step_naive(cells: &HashSet<(i64, i64)>, rows: i64, cols: i64) -> HashSet<(i64, i64)> {
    let mut next = HashSet::new();
    let mut candidates = HashSet::new();
    for &(r, c) in cells {
        for dr in -1..=1 {
            for dc in -1..=1 {
                candidates.insert((r + dr, c + dc));
            }
        }
    }

    for (r, c) in candidates {
        if r < 0 || c < 0 || r >= rows || c >= cols {
            continue;
        }
        let mut neighbors = 0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if cells.contains(&(r + dr, c + dc)) {
                    neighbors += 1;
                }
            }
        }
        let alive = cells.contains(&(r, c));
        let next_alive = if alive {
            neighbors == 2 || neighbors == 3
        } else {
            neighbors == 3
        };
        if next_alive {
            next.insert((r, c));
        }
    }

    next
}

fn collect_live(engine: &LifeGrid) -> HashSet<(i64, i64)> {
    let mut out = HashSet::new();
    engine.grid().for_each_alive(|c: Coord| {
        out.insert((c.row as i64, c.col as i64));
    });
    out
}

fn run_parity_case(rows: u32, cols: u32, density: f64, ticks: u64, seed: u64) {
    let palette = Palette::default();
    let layout = random_layout(rows, cols, density, seed);
    let mut engines: Vec<LifeGrid> = Evaluator::ALL
        .into_iter()
        .map(|evaluator| engine_with(&layout, evaluator))
        .collect();
    let mut naive = collect_live(&engines[0]);

    for tick in 1..=ticks {
        for engine in &mut engines {
            engine.advance(&palette);
        }
        naive = step_naive(&naive, rows as i64, cols as i64);

        let reference = &engines[0];
        assert_eq!(
            collect_live(reference),
            naive,
            "full scan diverged from naive stepper at tick {tick} (seed {seed})"
        );
        for engine in &engines[1..] {
            assert_eq!(
                engine.grid(),
                reference.grid(),
                "{} grid mismatch at tick {tick} (density {density} seed {seed})",
                engine.evaluator()
            );
            assert_eq!(
                engine.lifecycle(),
                reference.lifecycle(),
                "{} lifecycle mismatch at tick {tick} (density {density} seed {seed})",
                engine.evaluator()
            );
        }
    }
}

#[test]
fn parity_sparse_mid_dense() {
    run_parity_case(48, 48, 0.10, 30, 0xA1);
    run_parity_case(48, 48, 0.35, 30, 0xB2);
    run_parity_case(48, 48, 0.83, 20, 0xC3);
}

#[test]
fn parity_multiple_seeds_and_shapes() {
    for seed in [11u64, 22, 33, 44] {
        run_parity_case(37, 53, 0.3, 25, seed);
    }
    run_parity_case(1, 40, 0.5, 10, 0x51);
    run_parity_case(40, 1, 0.5, 10, 0x52);
    run_parity_case(2, 2, 1.0, 5, 0x53);
}

#[test]
fn cached_counts_stay_exact_over_long_runs() {
    let palette = Palette::default();
    for seed in [0xBADC0FFEEu64, 0x5EED_1234] {
        let layout = random_layout(64, 64, 0.33, seed);
        let mut engine = engine_with(&layout, Evaluator::ActiveCached);

        for tick in 1..=150 {
            engine.advance(&palette);
            let counts = engine.counts().expect("cached evaluator keeps counts");
            assert_eq!(
                counts.mismatch(engine.grid()),
                None,
                "stale count at tick {tick} (seed {seed:#x})"
            );
            engine
                .check_invariants()
                .unwrap_or_else(|err| panic!("tick {tick}: {err}"));
        }
    }
}

#[test]
fn invariants_hold_for_every_evaluator() {
    let palette = Palette::default();
    let layout = random_layout(40, 40, 0.4, 0xD37E_A515);
    for evaluator in Evaluator::ALL {
        let mut engine = engine_with(&layout, evaluator);
        for tick in 1..=100 {
            engine.advance(&palette);
            let sets = engine.lifecycle();
            assert!(
                sets.new_cells().is_disjoint(sets.survivors()),
                "{evaluator} tick {tick}"
            );
            assert!(sets.new_cells().is_disjoint(sets.dead_cells()));
            assert!(sets.survivors().is_disjoint(sets.dead_cells()));
            assert_eq!(sets.alive_len(), engine.grid().population());
            engine.check_invariants().expect("consistent state");
        }
    }
}

#[test]
fn edits_between_ticks_keep_evaluators_in_lockstep() {
    let palette = Palette::default();
    let layout = random_layout(30, 30, 0.3, 0xE017);
    let mut engines: Vec<LifeGrid> = Evaluator::ALL
        .into_iter()
        .map(|evaluator| engine_with(&layout, evaluator))
        .collect();

    for tick in 0..40u32 {
        for engine in &mut engines {
            match tick % 5 {
                0 => {
                    engine
                        .resurrect_cell(Coord::new(tick % 30, (tick * 7) % 30), &palette)
                        .unwrap();
                }
                1 => {
                    engine
                        .clear_cell(Coord::new((tick * 3) % 30, tick % 30), &palette)
                        .unwrap();
                }
                2 => {
                    engine.invert(&palette);
                }
                3 => {
                    engine.purge_survivors(3, &palette);
                }
                _ => {}
            }
            engine.advance(&palette);
            engine.check_invariants().expect("consistent after edit");
        }
        let reference = &engines[0];
        for engine in &engines[1..] {
            assert_eq!(engine.grid(), reference.grid(), "tick {tick}");
            assert_eq!(engine.lifecycle(), reference.lifecycle(), "tick {tick}");
        }
    }
}

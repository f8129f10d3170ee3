use rand::RngCore;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

use bloom_life::bloomlife::{Bounds, Grid};
use bloom_life::{Evaluator, LifeGrid, LifeGridConfig, Palette};

#[derive(Clone, Debug)]
struct BenchConfig {
    sizes: Vec<u32>,
    densities: Vec<f64>,
    warmup: u64,
    iters: u64,
    seed: u64,
    json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: vec![128, 256, 512],
            densities: vec![0.02, 0.07, 0.35],
            warmup: 3,
            iters: 50,
            seed: 0xA5A5_5EED_7788_1122,
            json: false,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct RunResult {
    evaluator: String,
    total_ms: f64,
    avg_ms: f64,
    population: usize,
    evaluated_last_tick: usize,
}

#[derive(Clone, Debug, Serialize)]
struct CaseReport {
    size: u32,
    density: f64,
    warmup: u64,
    iters: u64,
    seed: u64,
    runs: Vec<RunResult>,
    grids_match: bool,
}

fn parse_list<T: std::str::FromStr>(value: &str, flag: &str) -> Vec<T> {
    value
        .split(',')
        .map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("{flag} expects a comma-separated list"))
        })
        .collect()
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sizes" => {
                if let Some(v) = args.next() {
                    cfg.sizes = parse_list(&v, "--sizes");
                }
            }
            "--densities" => {
                if let Some(v) = args.next() {
                    cfg.densities = parse_list(&v, "--densities");
                }
            }
            "--warmup" => {
                if let Some(v) = args.next() {
                    cfg.warmup = v.parse().expect("--warmup expects u64");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters expects u64");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            "--json" => {
                cfg.json = true;
            }
            other => panic!("unknown arg: {other}"),
        }
    }
    cfg
}

fn seed_layout(size: u32, density: f64, seed: u64) -> Grid {
    let bounds = Bounds::new(size, size).expect("--sizes must be positive");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let cells = (0..bounds.len())
        .map(|_| rng.next_u64() <= threshold)
        .collect();
    Grid::from_cells(bounds, cells).expect("cell buffer sized from bounds")
}

fn run_evaluator(cfg: &BenchConfig, layout: &Grid, evaluator: Evaluator) -> (RunResult, Grid) {
    let palette = Palette::default();
    let config = LifeGridConfig::default()
        .evaluator(evaluator)
        .verify_ticks(false);
    let mut engine = LifeGrid::with_config(layout.rows(), layout.cols(), config)
        .expect("layout dimensions are positive");
    engine
        .load_layout(layout.clone(), &palette)
        .expect("layout has the engine's shape");

    engine.advance_n(cfg.warmup, &palette);

    let start = Instant::now();
    engine.advance_n(cfg.iters, &palette);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;

    let result = RunResult {
        evaluator: evaluator.to_string(),
        total_ms,
        avg_ms: total_ms / cfg.iters.max(1) as f64,
        population: engine.population(),
        evaluated_last_tick: engine.active_region().len(),
    };
    (result, engine.grid().clone())
}

fn main() {
    let cfg = parse_args();

    // Layout generation is independent per case; timing below stays serial.
    let cases: Vec<(u32, f64)> = cfg
        .sizes
        .iter()
        .flat_map(|&size| cfg.densities.iter().map(move |&density| (size, density)))
        .collect();
    let layouts: Vec<Grid> = cases
        .par_iter()
        .map(|&(size, density)| seed_layout(size, density, cfg.seed))
        .collect();

    for (&(size, density), layout) in cases.iter().zip(&layouts) {
        let mut runs = Vec::new();
        let mut finals = Vec::new();
        for evaluator in Evaluator::ALL {
            let (result, grid) = run_evaluator(&cfg, layout, evaluator);
            runs.push(result);
            finals.push(grid);
        }
        let grids_match = finals.windows(2).all(|pair| pair[0] == pair[1]);
        let report = CaseReport {
            size,
            density,
            warmup: cfg.warmup,
            iters: cfg.iters,
            seed: cfg.seed,
            runs,
            grids_match,
        };

        if cfg.json {
            println!(
                "{}",
                serde_json::to_string(&report).expect("report serializes")
            );
        } else {
            println!(
                "{size}x{size} density={density:.2} [{}]",
                if report.grids_match { "MATCH" } else { "MISMATCH" }
            );
            let full_avg = report.runs[0].avg_ms;
            for run in &report.runs {
                println!(
                    "  {:<7} total_ms={:.6}, avg_ms={:.6}, population={}, evaluated={}, speedup={:.3}x",
                    run.evaluator,
                    run.total_ms,
                    run.avg_ms,
                    run.population,
                    run.evaluated_last_tick,
                    full_avg / run.avg_ms,
                );
            }
        }
    }
}

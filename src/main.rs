#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bloom_life::bloomlife::{Bounds, Grid};
use bloom_life::{Evaluator, LifeGrid, LifeGridConfig, Palette};

const SEED: u64 = 0x5EED_1234_ABCD_EF01;

struct MainArgs {
    rows: u32,
    cols: u32,
    density: f64,
    ticks: u64,
    check_interval: u64,
    palette: Palette,
}

impl Default for MainArgs {
    fn default() -> Self {
        Self {
            rows: 600,
            cols: 800,
            density: 0.07,
            ticks: 2000,
            check_interval: 500,
            palette: Palette::default(),
        }
    }
}

fn load_palette(path: &str) -> Palette {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("cannot read palette {path}: {err}"));
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("invalid palette {path}: {err}"))
}

const USAGE: &str = "usage: bloom-life [--rows N] [--cols N] [--density F] [--ticks N] [--check-interval N] [--palette FILE]";

/// Pull the value following `flag` and parse it, panicking with `what` on failure.
fn flag_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
    what: &str,
) -> T {
    let Some(raw) = args.next() else {
        panic!("{flag} requires a value\n{USAGE}");
    };
    raw.parse()
        .unwrap_or_else(|_| panic!("{flag} requires {what}, got {raw:?}"))
}

fn parse_args() -> MainArgs {
    let mut main_args = MainArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--rows" => main_args.rows = flag_value(&mut args, &flag, "a positive integer"),
            "--cols" => main_args.cols = flag_value(&mut args, &flag, "a positive integer"),
            "--density" => {
                main_args.density = flag_value(&mut args, &flag, "a number in [0, 1]")
            }
            "--ticks" => main_args.ticks = flag_value(&mut args, &flag, "a positive integer"),
            "--check-interval" => {
                let n: u64 = flag_value(&mut args, &flag, "a positive integer");
                main_args.check_interval = n.max(1);
            }
            "--palette" => {
                let path: String = flag_value(&mut args, &flag, "a file path");
                main_args.palette = load_palette(&path);
            }
            other => panic!("unknown argument: {other}\n{USAGE}"),
        }
    }
    main_args
}

fn seed_random_layout(rows: u32, cols: u32, density: f64) -> Grid {
    let bounds = Bounds::new(rows, cols).expect("--rows and --cols must be positive");
    let mut rng = rand::rngs::StdRng::seed_from_u64(SEED);
    let threshold = (u64::MAX as f64 * density) as u64;
    let cells = (0..bounds.len())
        .map(|_| rng.next_u64() <= threshold)
        .collect();
    Grid::from_cells(bounds, cells).expect("cell buffer sized from bounds")
}

struct Run {
    engine: LifeGrid,
    total: Duration,
    phase_start: Duration,
    redraws: u64,
}

fn run_checked(args: &MainArgs) {
    let layout = seed_random_layout(args.rows, args.cols, args.density);
    info!(
        rows = args.rows,
        cols = args.cols,
        population = layout.population(),
        "seeded layout"
    );

    let mut runs: Vec<Run> = Evaluator::ALL
        .into_iter()
        .map(|evaluator| {
            let config = LifeGridConfig::default()
                .evaluator(evaluator)
                .verify_ticks(false);
            let mut engine = LifeGrid::with_config(args.rows, args.cols, config)
                .expect("dimensions validated by layout");
            engine
                .load_layout(layout.clone(), &args.palette)
                .expect("layout has the engine's shape");
            Run {
                engine,
                total: Duration::ZERO,
                phase_start: Duration::ZERO,
                redraws: 0,
            }
        })
        .collect();

    let checkpoints = args.ticks.div_ceil(args.check_interval);
    let mut done = 0u64;
    for _ in 0..checkpoints {
        let batch = args.check_interval.min(args.ticks - done);
        done += batch;

        for run in &mut runs {
            let start = Instant::now();
            for _ in 0..batch {
                run.redraws += run.engine.advance(&args.palette).len() as u64;
            }
            run.total += start.elapsed();
        }

        let reference = runs[0].engine.grid();
        let all_match = runs[1..].iter().all(|run| run.engine.grid() == reference);
        let match_status = if all_match { "MATCH" } else { "MISMATCH" };
        println!(
            "Tick {done}: population = {}, alive = {:.2}% [{match_status}]",
            runs[0].engine.population(),
            runs[0].engine.alive_percentage()
        );

        let line: Vec<String> = runs
            .iter_mut()
            .map(|run| {
                let phase = run.total - run.phase_start;
                run.phase_start = run.total;
                let ms = phase.as_secs_f64() * 1000.0;
                format!(
                    "{}: {ms:.3} ms, {:.6} ms/tick",
                    run.engine.evaluator(),
                    ms / batch as f64
                )
            })
            .collect();
        println!("  {}", line.join(" | "));
    }

    println!("\n--- Summary ({done} ticks) ---");
    let full_ms = runs[0].total.as_secs_f64() * 1000.0;
    for run in &runs {
        let total_ms = run.total.as_secs_f64() * 1000.0;
        println!(
            "{:<7} {total_ms:>10.3} ms total, {:.6} ms/tick, {} redraws, speedup vs full {:.2}x",
            run.engine.evaluator().to_string(),
            total_ms / done.max(1) as f64,
            run.redraws,
            full_ms / total_ms
        );
    }
    info!(generation = runs[0].engine.generation(), "finished");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = parse_args();
    run_checked(&args);
}

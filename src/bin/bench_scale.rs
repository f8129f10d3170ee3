use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;

use bloom_life::bloomlife::{Bounds, Grid};
use bloom_life::{Evaluator, LifeGrid, LifeGridConfig, Palette};

fn bench_cached(size: u32, density: f64, iterations: u64) -> (f64, usize) {
    let bounds = Bounds::new(size, size).expect("positive size");
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    let threshold = (u64::MAX as f64 * density) as u64;
    let cells = (0..bounds.len())
        .map(|_| rng.next_u64() <= threshold)
        .collect();
    let layout = Grid::from_cells(bounds, cells).expect("cell buffer sized from bounds");

    let palette = Palette::default();
    let config = LifeGridConfig::default()
        .evaluator(Evaluator::ActiveCached)
        .verify_ticks(false);
    let mut engine = LifeGrid::with_config(size, size, config).expect("positive size");
    engine
        .load_layout(layout, &palette)
        .expect("layout has the engine's shape");

    let start = Instant::now();
    engine.advance_n(iterations, &palette);
    let duration = start.elapsed();

    let total_ms = duration.as_secs_f64() * 1000.0;
    (total_ms, engine.population())
}

fn main() {
    let scales: &[(u32, u64)] = &[
        (128, 400),
        (256, 300),
        (512, 200),
        (1024, 100),
        (2048, 50),
    ];

    println!(
        "{:<12} {:>10} {:>8} {:>12} {:>10}",
        "Grid", "Population", "Iters", "Total(ms)", "Avg(ms)"
    );
    println!("{}", "-".repeat(56));

    for &(size, iters) in scales {
        let (total_ms, population) = bench_cached(size, 0.07, iters);
        let avg_ms = total_ms / iters as f64;
        println!(
            "{:<12} {:>10} {:>8} {:>12.1} {:>10.4}",
            format!("{}x{}", size, size),
            population,
            iters,
            total_ms,
            avg_ms
        );
    }
}

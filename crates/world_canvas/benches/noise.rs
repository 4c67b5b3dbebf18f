mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use world_canvas::field::{DomainWarp, NoiseField};
use world_canvas::random::SeededRandom;

const GRID: u32 = 256;
const ZOOMS: [f64; 3] = [0.002, 0.003, 0.004];

fn noise_sample_benches(c: &mut Criterion) {
    let field = NoiseField::new(&mut SeededRandom::new("bench_canvas"));
    let mut group = c.benchmark_group("noise/simplex");
    group.throughput(common::pixels_throughput(GRID, GRID));

    for &zoom in &ZOOMS {
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &zoom, |b, &zoom| {
            b.iter(|| {
                let mut acc = 0.0;
                for y in 0..GRID {
                    for x in 0..GRID {
                        acc += field.sample(x as f64 * zoom, y as f64 * zoom);
                    }
                }
                black_box(acc);
            });
        });
    }

    group.finish();
}

fn domain_warp_benches(c: &mut Criterion) {
    let field = NoiseField::new(&mut SeededRandom::new("bench_canvas"));
    let mut group = c.benchmark_group("noise/domain_warp");
    group.throughput(common::pixels_throughput(GRID, GRID));

    for &zoom in &ZOOMS {
        let warp = DomainWarp::new(zoom, 200.0);
        group.bench_with_input(BenchmarkId::from_parameter(zoom), &warp, |b, warp| {
            b.iter(|| {
                let mut acc = 0.0;
                for y in 0..GRID {
                    for x in 0..GRID {
                        acc += warp.evaluate(&field, x as f64, y as f64).unwrap_or(0.0);
                    }
                }
                black_box(acc);
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = noise_sample_benches, domain_warp_benches
}
criterion_main!(benches);

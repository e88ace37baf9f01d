// Benchmark for trajectory design and sampling
// Run with: cargo bench

use std::hint::black_box;

use accel_designer::{AccelDesigner, MotionLimits, Profile};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_constraints(n: usize) -> Vec<(MotionLimits, f64, f64, f64)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let limits = MotionLimits::new(
                rng.random_range(100_000.0..500_000.0),
                rng.random_range(1_000.0..18_000.0),
            );
            let v_sat = rng.random_range(90.0..4_800.0);
            let v_target = rng.random_range(90.0..4_800.0);
            let distance = rng.random_range(0.0..32.0 * 90.0);
            (limits, v_sat, v_target, distance)
        })
        .collect()
}

fn bench_design(c: &mut Criterion) {
    let constraints = random_constraints(100);
    c.bench_function("design 100 chained moves", |b| {
        b.iter(|| {
            let (mut v, mut x, mut t) = (0.0, 0.0, 0.0);
            for &(limits, v_sat, v_target, distance) in &constraints {
                let ad = AccelDesigner::with_start(limits, v, v_sat, v_target, distance, x, t);
                v = ad.v_end();
                x = ad.x_end();
                t = ad.t_end();
            }
            black_box((v, x, t))
        });
    });
}

fn bench_sampling(c: &mut Criterion) {
    let limits = MotionLimits::new(240_000.0, 3_600.0);
    let ad = AccelDesigner::new(limits, 0.0, 1_200.0, 0.0, 720.0);
    c.bench_function("sample 1 kHz", |b| {
        b.iter(|| {
            let sum: f64 = ad.samples(0.001).map(|s| s.pos).sum();
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_design, bench_sampling);
criterion_main!(benches);

//! Benchmarks for the root finders.
//!
//! Run with: cargo bench -p convex-math

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use convex_math::solvers::{Bisection, Brent, Newton, Ridder, Solver1D, SolverConfig};

/// Price of a 5% annual 10-year bond minus 95.
fn price_gap(y: f64) -> f64 {
    let coupons: f64 = (1..=10).map(|t| 5.0 / (1.0 + y).powi(t)).sum();
    coupons + 100.0 / (1.0 + y).powi(10) - 95.0
}

fn bench_yield_solve(c: &mut Criterion) {
    let config = SolverConfig::new(1e-12, 100);
    let mut group = c.benchmark_group("yield_solve");

    group.bench_function("brent", |b| {
        b.iter(|| Brent.solve(&price_gap, black_box(0.05), 0.01, &config))
    });
    group.bench_function("newton", |b| {
        b.iter(|| Newton.solve(&price_gap, black_box(0.05), 0.01, &config))
    });
    group.bench_function("ridder", |b| {
        b.iter(|| Ridder.solve(&price_gap, black_box(0.05), 0.01, &config))
    });
    group.bench_function("bisection", |b| {
        b.iter(|| Bisection.solve(&price_gap, black_box(0.05), 0.01, &config))
    });

    group.finish();
}

criterion_group!(benches, bench_yield_solve);
criterion_main!(benches);

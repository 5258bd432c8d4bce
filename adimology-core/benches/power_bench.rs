//! Criterion benchmarks for the Fraksi hot paths.
//!
//! Benchmarks:
//! 1. Tick counting over intervals of increasing width
//! 2. Target projection under both crossing policies
//! 3. Full power calculation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use adimology_core::{advance_with, compute_power, count_ticks, CalculationInput, CrossingPolicy};

fn bench_count_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_ticks");
    for upper in [280.0, 1_500.0, 6_000.0] {
        group.bench_with_input(BenchmarkId::from_parameter(upper), &upper, |b, &upper| {
            b.iter(|| count_ticks(black_box(191.0), black_box(upper)))
        });
    }
    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for policy in [CrossingPolicy::FineBandsOnly, CrossingPolicy::AllBands] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{policy:?}")),
            &policy,
            |b, &policy| b.iter(|| advance_with(policy, black_box(180.0), black_box(4_000.0))),
        );
    }
    group.finish();
}

fn bench_compute_power(c: &mut Criterion) {
    let input = CalculationInput::new(100_000.0, 1250.0, 191.0, 280.0, 205_792.0, 683_327.0);
    c.bench_function("compute_power", |b| b.iter(|| compute_power(black_box(&input))));
}

criterion_group!(benches, bench_count_ticks, bench_advance, bench_compute_power);
criterion_main!(benches);

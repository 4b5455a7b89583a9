use super::CountingSink;
use criterion::{BenchmarkId, Criterion};
use lobstream_rs::{GeneratorConfig, LobEventGenerator};
use std::hint::black_box;

/// Register benchmarks for writing snapshot blocks of various depths
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generator - Snapshots");

    for depth in [10usize, 100, 400].iter() {
        group.bench_with_input(BenchmarkId::new("emit_snapshot", depth), depth, |b, &depth| {
            let config = GeneratorConfig {
                init_depth: depth,
                ..GeneratorConfig::default()
            };
            let mut generator =
                LobEventGenerator::new(config, CountingSink::default()).expect("valid config");
            b.iter(|| black_box(generator.emit_snapshot(None)))
        });
    }

    // Rebuilding the book is what a liveness recovery costs
    for depth in [10usize, 200].iter() {
        group.bench_with_input(BenchmarkId::new("initialize", depth), depth, |b, &depth| {
            let config = GeneratorConfig {
                init_depth: depth,
                ..GeneratorConfig::default()
            };
            let mut generator =
                LobEventGenerator::new(config, CountingSink::default()).expect("valid config");
            b.iter(|| generator.initialize())
        });
    }

    group.finish();
}

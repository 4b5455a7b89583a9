use super::CountingSink;
use criterion::{BenchmarkId, Criterion, Throughput};
use lobstream_rs::{GeneratorConfig, LobEventGenerator};
use std::hint::black_box;

/// Register benchmarks for incremental generation under different action mixes
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generator - Incrementals");
    group.throughput(Throughput::Elements(1_000));

    let mixes = [
        ("default", 0.10, 0.80, 0.10),
        ("new_heavy", 0.60, 0.30, 0.10),
        ("balanced", 0.33, 0.34, 0.33),
    ];

    for (name, p_new, p_change, p_delete) in mixes {
        group.bench_function(BenchmarkId::new("stream_1000", name), |b| {
            let config = GeneratorConfig {
                p_new,
                p_change,
                p_delete,
                ..GeneratorConfig::default()
            };
            let mut generator =
                LobEventGenerator::new(config, CountingSink::default()).expect("valid config");
            b.iter(|| black_box(generator.emit_incremental_stream(1_000)))
        });
    }

    // A tight soft cap forces deletes on most steps
    group.bench_function("soft_cap_pressure", |b| {
        let config = GeneratorConfig {
            p_new: 0.6,
            p_change: 0.3,
            p_delete: 0.1,
            max_depth_soft: 210,
            ..GeneratorConfig::default()
        };
        let mut generator =
            LobEventGenerator::new(config, CountingSink::default()).expect("valid config");
        b.iter(|| black_box(generator.emit_incremental_stream(1_000)))
    });

    group.finish();
}

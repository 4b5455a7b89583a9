use super::CountingSink;
use criterion::{BenchmarkId, Criterion, Throughput};
use lobstream_rs::{GeneratorConfig, LobEventGenerator};
use std::hint::black_box;

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generator - Full Run");
    group.sample_size(20);

    for events in [10_000u64, 100_000].iter() {
        group.throughput(Throughput::Elements(*events));
        group.bench_with_input(BenchmarkId::new("run", events), events, |b, &events| {
            b.iter(|| {
                let config = GeneratorConfig {
                    events,
                    snapshot_every: 5_000,
                    gap_every: 7_500,
                    ..GeneratorConfig::default()
                };
                let mut generator = LobEventGenerator::new(config, CountingSink::default())
                    .expect("valid config");
                let stats = generator.run().expect("run");
                black_box((stats, generator.into_sink().bytes))
            })
        });
    }

    group.finish();
}

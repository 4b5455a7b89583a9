use criterion::{Criterion, Throughput};
use lobstream_rs::generator::EventRecord;
use lobstream_rs::{BookBuilder, GeneratorConfig, LobEventGenerator};
use std::hint::black_box;

/// Register benchmarks for replaying a generated stream
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Replay - BookBuilder");

    let config = GeneratorConfig {
        events: 20_000,
        snapshot_every: 5_000,
        init_depth: 50,
        ..GeneratorConfig::default()
    };
    let mut generator = LobEventGenerator::new(config, Vec::<String>::new()).expect("valid config");
    generator.run().expect("run");
    let lines = generator.into_sink();

    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("replay_20000_incrementals", |b| {
        b.iter(|| {
            let mut builder = BookBuilder::new();
            for line in &lines {
                builder.on_line(line);
            }
            black_box(builder.stats().applied_count)
        })
    });

    let records: Vec<EventRecord> = lines[1..]
        .iter()
        .map(|line| line.parse().expect("valid record"))
        .collect();
    group.bench_function("replay_parsed_records", |b| {
        b.iter(|| {
            let mut builder = BookBuilder::new();
            for record in &records {
                builder.on_record(record);
            }
            black_box(builder.stats().applied_count)
        })
    });

    group.finish();
}

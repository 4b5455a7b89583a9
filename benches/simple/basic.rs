use criterion::Criterion;
use lobstream_rs::{GeneratorConfig, LobEventGenerator};
use std::hint::black_box;

pub fn benchmark_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("Basic Generator Operations");

    // Validation, seeding and the initial 200-level book
    group.bench_function("create_generator", |b| {
        b.iter(|| {
            let generator =
                LobEventGenerator::new(GeneratorConfig::default(), Vec::<String>::new());
            black_box(generator.is_ok())
        })
    });

    group.bench_function("single_incremental", |b| {
        b.iter(|| {
            let mut generator =
                LobEventGenerator::new(GeneratorConfig::default(), Vec::<String>::new())
                    .expect("valid config");
            let _ = black_box(generator.emit_incremental_stream(1));
        })
    });

    group.finish();
}

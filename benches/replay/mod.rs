pub mod builder;

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    builder::register_benchmarks(c);
}

use criterion::{criterion_group, criterion_main};

mod generator;
mod replay;
mod simple;

use generator::register_benchmarks as register_generator_benchmarks;
use replay::register_benchmarks as register_replay_benchmarks;
use simple::basic::benchmark_data;

criterion_group!(
    benches,
    benchmark_data,
    register_generator_benchmarks,
    register_replay_benchmarks,
);

criterion_main!(benches);

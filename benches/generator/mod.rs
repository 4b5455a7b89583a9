pub mod full_run;
pub mod incrementals;
pub mod snapshots;

use lobstream_rs::{EventSink, GeneratorError};

/// Discards records, counting bytes so the work is not optimized away
#[derive(Default)]
pub struct CountingSink {
    pub bytes: usize,
}

impl EventSink for CountingSink {
    fn write_record(&mut self, record: &str) -> Result<(), GeneratorError> {
        self.bytes += record.len() + 1;
        Ok(())
    }
}

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    snapshots::register_benchmarks(c);
    incrementals::register_benchmarks(c);
    full_run::register_benchmarks(c);
}

//! Output sinks that accept the ordered stream of text records

use super::error::GeneratorError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Anything that accepts an ordered sequence of text records.
///
/// Records are passed without a line terminator; the sink decides how to
/// delimit them.
pub trait EventSink {
    /// Append one record
    fn write_record(&mut self, record: &str) -> Result<(), GeneratorError>;

    /// Push buffered records to their destination
    fn flush(&mut self) -> Result<(), GeneratorError> {
        Ok(())
    }
}

impl EventSink for Vec<String> {
    fn write_record(&mut self, record: &str) -> Result<(), GeneratorError> {
        self.push(record.to_string());
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn write_record(&mut self, record: &str) -> Result<(), GeneratorError> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> Result<(), GeneratorError> {
        (**self).flush()
    }
}

/// Newline-delimited sink over any writer
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvSink<BufWriter<File>> {
    /// Create (or truncate) a file and wrap it in a buffered sink
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::with_capacity(1 << 20, file)))
    }
}

impl<W: Write> EventSink for CsvSink<W> {
    fn write_record(&mut self, record: &str) -> Result<(), GeneratorError> {
        self.writer.write_all(record.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GeneratorError> {
        self.writer.flush()?;
        Ok(())
    }
}

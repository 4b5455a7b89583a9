//! Stamps events with clock and sequence and writes them to a sink

use super::error::GeneratorError;
use super::event::{EventRecord, HEADER, MarketEvent};
use super::sink::EventSink;
use std::fmt::Write as _;
use tracing::trace;

/// Serializes `(timestamp, sequence, event)` tuples into an [`EventSink`].
///
/// The clock advances by a fixed step on every emitted line. The sequence
/// number only moves when the caller says so, because a snapshot block spans
/// several lines under one sequence number.
#[derive(Debug)]
pub struct EventEmitter<S: EventSink> {
    sink: S,
    ts_ns: i64,
    dt_ns: i64,
    seq: u64,
    lines_written: u64,
    line: String,
}

impl<S: EventSink> EventEmitter<S> {
    /// Create an emitter starting at `start_ts` / `start_seq`
    pub fn new(sink: S, start_ts: i64, dt_ns: i64, start_seq: u64) -> Self {
        Self {
            sink,
            ts_ns: start_ts,
            dt_ns,
            seq: start_seq,
            lines_written: 0,
            line: String::with_capacity(64),
        }
    }

    /// Write the fixed header row; does not touch clock or sequence
    pub fn write_header(&mut self) -> Result<(), GeneratorError> {
        self.sink.write_record(HEADER)
    }

    /// Emit one record at the current timestamp and sequence, then advance the clock
    pub fn emit(&mut self, event: MarketEvent) -> Result<EventRecord, GeneratorError> {
        let record = EventRecord {
            ts_ns: self.ts_ns,
            seq: self.seq,
            event,
        };

        self.line.clear();
        write!(self.line, "{}", record)?;
        self.sink.write_record(&self.line)?;
        trace!("emit {}", self.line);

        self.ts_ns += self.dt_ns;
        self.lines_written += 1;
        Ok(record)
    }

    /// Move to the next logical event
    pub fn advance_seq(&mut self) {
        self.seq += 1;
    }

    /// Skip `count` sequence numbers, leaving a hole in the numbering
    pub fn skip_seq(&mut self, count: u64) {
        self.seq += count;
    }

    /// Sequence number the next record will carry
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Timestamp the next record will carry
    pub fn ts_ns(&self) -> i64 {
        self.ts_ns
    }

    /// Records written so far, header excluded
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn flush(&mut self) -> Result<(), GeneratorError> {
        self.sink.flush()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the emitter, returning the sink
    pub fn finish(self) -> S {
        self.sink
    }
}

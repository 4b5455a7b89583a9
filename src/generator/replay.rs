//! Reference book reconstruction from a snapshot + incremental stream.
//!
//! [`BookBuilder`] consumes records in stream order and maintains the book a
//! downstream consumer would see. It only trusts its book while `Live`:
//! a sequence gap drops it to `OutOfSync` until the next complete snapshot.

use super::book::{Book, MutationOutcome};
use super::event::{EventRecord, HEADER, MarketEvent};
use tracing::{debug, trace, warn};

/// Synchronization state of a [`BookBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// No snapshot seen yet
    NeedSnapshot,
    /// Between `SB` and `SE`
    InSnapshot,
    /// Book is consistent with the stream
    Live,
    /// A sequence gap was detected; waiting for a snapshot
    OutOfSync,
}

/// Counters collected while replaying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderStats {
    /// Sequence number of the last applied event
    pub last_seq: Option<u64>,
    /// Incrementals whose sequence skipped ahead
    pub gap_count: u64,
    /// Incrementals at or below the last applied sequence
    pub dup_or_old_count: u64,
    /// Times the best bid reached or crossed the best ask
    pub crossed_count: u64,
    /// Incrementals that did not match the book
    pub anomaly_count: u64,
    /// Lines that could not be parsed
    pub malformed_count: u64,
    /// Snapshot blocks completed
    pub snapshot_count: u64,
    /// Incrementals applied to the book
    pub applied_count: u64,
}

/// Rebuilds an aggregated book from stream records
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book: Book,
    state: BuildState,
    stats: BuilderStats,
    snapshot_seq: Option<u64>,
}

impl Default for BookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BookBuilder {
    pub fn new() -> Self {
        Self {
            book: Book::default(),
            state: BuildState::NeedSnapshot,
            stats: BuilderStats::default(),
            snapshot_seq: None,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn stats(&self) -> &BuilderStats {
        &self.stats
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// The book is only meaningful while `Live`
    pub fn book_valid(&self) -> bool {
        self.state == BuildState::Live
    }

    /// Parse and apply one CSV line. The header and blank lines are skipped;
    /// unparseable lines are counted and skipped.
    pub fn on_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() || line == HEADER {
            return;
        }
        match line.parse::<EventRecord>() {
            Ok(record) => self.on_record(&record),
            Err(err) => {
                self.stats.malformed_count += 1;
                warn!("Skipping line: {}", err);
            }
        }
    }

    /// Apply one record
    pub fn on_record(&mut self, record: &EventRecord) {
        match record.event {
            MarketEvent::SnapshotBegin => self.on_snapshot_begin(record.seq),
            MarketEvent::SnapshotLevel { side, price, qty } => {
                if self.state == BuildState::InSnapshot {
                    self.book.apply_snapshot_level(side, price, qty);
                }
            }
            MarketEvent::SnapshotEnd => self.on_snapshot_end(record.seq),
            MarketEvent::Incremental { .. } => self.on_incremental(record),
        }
    }

    fn on_snapshot_begin(&mut self, seq: u64) {
        self.book.clear();
        self.snapshot_seq = Some(seq);
        self.state = BuildState::InSnapshot;
    }

    fn on_snapshot_end(&mut self, seq: u64) {
        if self.state != BuildState::InSnapshot {
            return;
        }
        if self.snapshot_seq != Some(seq) {
            debug!(
                "Snapshot end seq {} differs from begin seq {:?}",
                seq, self.snapshot_seq
            );
        }
        self.stats.last_seq = Some(seq);
        self.stats.snapshot_count += 1;
        self.state = BuildState::Live;
        self.check_crossed();
    }

    fn on_incremental(&mut self, record: &EventRecord) {
        if self.state != BuildState::Live {
            return;
        }
        let MarketEvent::Incremental {
            side,
            price,
            qty,
            action,
        } = record.event
        else {
            return;
        };

        if let Some(last) = self.stats.last_seq {
            if record.seq > last + 1 {
                self.stats.gap_count += 1;
                self.state = BuildState::OutOfSync;
                debug!("Gap after seq {}: got {}", last, record.seq);
                return;
            }
            if record.seq <= last {
                self.stats.dup_or_old_count += 1;
                return;
            }
        }

        if let MutationOutcome::Anomaly(kind) = self.book.apply_incremental(side, price, qty, action)
        {
            self.stats.anomaly_count += 1;
            trace!("Anomaly at seq {}: {:?}", record.seq, kind);
        }
        self.stats.applied_count += 1;
        self.stats.last_seq = Some(record.seq);
        self.check_crossed();
    }

    fn check_crossed(&mut self) {
        if self.state != BuildState::Live {
            return;
        }
        if let Some(top) = self.book.top() {
            if top.is_crossed() {
                self.stats.crossed_count += 1;
            }
        }
    }
}

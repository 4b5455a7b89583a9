//! Snapshot + incremental event stream generator.
//!
//! [`LobEventGenerator`] keeps an aggregated book, mutates it with random
//! `New`/`Change`/`Delete` incrementals and writes every mutation (plus
//! periodic snapshot blocks) to an [`EventSink`]. All randomness comes from a
//! single ChaCha stream seeded from the configuration, so a given
//! configuration always produces the same bytes.

use super::book::{Book, BookParams, MutationOutcome};
use super::config::{ActionWeights, GeneratorConfig};
use super::emitter::EventEmitter;
use super::error::GeneratorError;
use super::event::{Action, MarketEvent, Side};
use super::sink::EventSink;
use crate::utils::choose_key;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, trace};

/// Chance that an over-deep side gets a forced delete on a given step
const SOFT_CAP_DELETE_PROBABILITY: f64 = 0.7;

/// Counters collected while generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorStats {
    /// Snapshot blocks written
    pub snapshots: u64,
    /// Incremental records written
    pub incrementals: u64,
    /// Lines written, header excluded
    pub lines: u64,
    /// Incrementals that did not match the internal book
    pub anomalies: u64,
    /// Emergency rebuilds after a side ran empty
    pub recoveries: u64,
    /// Sequence gaps injected
    pub gaps: u64,
    /// Steps on which the midpoint actually moved
    pub mid_moves: u64,
    /// Steps whose action was replaced by a soft-cap delete
    pub soft_cap_overrides: u64,
}

/// A drawn incremental before it is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mutation {
    side: Side,
    price: i64,
    qty: i64,
    action: Action,
}

/// The book-state simulator and event emission state machine
pub struct LobEventGenerator<S: EventSink> {
    config: GeneratorConfig,
    weights: ActionWeights,
    params: BookParams,
    book: Book,
    rng: ChaCha8Rng,
    emitter: EventEmitter<S>,
    stats: GeneratorStats,
}

impl<S: EventSink> LobEventGenerator<S> {
    /// Validate `config`, seed the random source and build the initial book.
    ///
    /// Nothing is written to `sink` until a snapshot or incremental is
    /// emitted, so a configuration error leaves the sink untouched.
    pub fn new(config: GeneratorConfig, sink: S) -> Result<Self, GeneratorError> {
        let weights = config.validate()?;
        let params = config.book_params();
        let emitter = EventEmitter::new(sink, config.start_ts, config.dt_ns, config.start_seq);

        let mut generator = Self {
            weights,
            params,
            book: Book::new(config.base_mid),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            emitter,
            stats: GeneratorStats::default(),
            config,
        };
        generator.initialize();
        Ok(generator)
    }

    /// Rebuild the symmetric book around the current midpoint
    pub fn initialize(&mut self) {
        self.book.reinitialize(&self.params, &mut self.rng);
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Internal mirror of the book the stream describes
    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn midpoint(&self) -> i64 {
        self.book.midpoint()
    }

    /// Sequence number the next logical event will carry
    pub fn seq(&self) -> u64 {
        self.emitter.seq()
    }

    pub fn stats(&self) -> GeneratorStats {
        GeneratorStats {
            lines: self.emitter.lines_written(),
            ..self.stats
        }
    }

    /// Records written so far, for sinks that keep them
    pub fn sink(&self) -> &S {
        self.emitter.sink()
    }

    /// Consume the generator, returning the sink
    pub fn into_sink(self) -> S {
        self.emitter.finish()
    }

    /// Write a snapshot block: `SB`, up to `max_levels` bid levels best to
    /// worst, up to `max_levels` ask levels best to worst, `SE`.
    ///
    /// Every line of the block carries the current sequence number, which
    /// then advances by exactly one. `None` writes `init_depth` levels.
    pub fn emit_snapshot(&mut self, max_levels: Option<usize>) -> Result<(), GeneratorError> {
        let levels = max_levels.unwrap_or(self.config.init_depth);
        let seq = self.emitter.seq();

        self.emitter.emit(MarketEvent::SnapshotBegin)?;
        for side in Side::BOTH {
            let book_side = self.book.side(side);
            for price in book_side.prices_sorted(side).into_iter().take(levels) {
                if let Some(qty) = book_side.get(price) {
                    self.emitter
                        .emit(MarketEvent::SnapshotLevel { side, price, qty })?;
                }
            }
        }
        self.emitter.emit(MarketEvent::SnapshotEnd)?;
        self.emitter.advance_seq();

        self.stats.snapshots += 1;
        trace!(
            "Snapshot at seq {}: {} bids, {} asks",
            seq,
            self.book.bids().len().min(levels),
            self.book.asks().len().min(levels)
        );
        Ok(())
    }

    /// Generate, emit and apply `n_events` incrementals
    pub fn emit_incremental_stream(&mut self, n_events: u64) -> Result<(), GeneratorError> {
        for _ in 0..n_events {
            self.step()?;
        }
        Ok(())
    }

    /// Skip `size` sequence numbers (at least one) before the next event
    pub fn inject_gap(&mut self, size: u64) {
        let size = size.max(1);
        let from = self.emitter.seq();
        self.emitter.skip_seq(size);
        self.stats.gaps += 1;
        debug!("Sequence gap: {} -> {}", from, self.emitter.seq());
    }

    /// Produce the whole stream described by the configuration.
    ///
    /// Writes the header and an initial snapshot, then chunks of at most
    /// `snapshot_every` incrementals separated by snapshots. A snapshot is
    /// only written after a chunk when more incrementals follow. With
    /// `gap_every > 0`, the sequence skips `gap_size` numbers each time the
    /// count of emitted incrementals reaches a multiple of `gap_every`.
    pub fn run(&mut self) -> Result<GeneratorStats, GeneratorError> {
        let total = self.config.events;
        let snapshot_every = self.config.snapshot_every;
        let gap_every = self.config.gap_every;
        let gap_size = self.config.effective_gap_size();
        let depth = Some(self.config.effective_snapshot_depth());

        info!(
            "Generating {} incrementals (seed {}, snapshot every {}, depth {:?})",
            total, self.config.seed, snapshot_every, depth
        );

        self.emitter.write_header()?;
        self.emit_snapshot(depth)?;

        let mut emitted = 0u64;
        while emitted < total {
            let chunk_end = emitted + snapshot_every.min(total - emitted);

            while emitted < chunk_end {
                if gap_every > 0 && emitted > 0 && emitted % gap_every == 0 {
                    self.inject_gap(gap_size);
                }
                let until_gap = if gap_every > 0 {
                    gap_every - emitted % gap_every
                } else {
                    u64::MAX
                };
                let n = (chunk_end - emitted).min(until_gap);
                self.emit_incremental_stream(n)?;
                emitted += n;
            }

            if emitted < total {
                self.emit_snapshot(depth)?;
            }
        }

        self.emitter.flush()?;

        let stats = self.stats();
        info!(
            "Generated {} lines: {} snapshots, {} incrementals, {} gaps, {} recoveries, {} anomalies",
            stats.lines,
            stats.snapshots,
            stats.incrementals,
            stats.gaps,
            stats.recoveries,
            stats.anomalies
        );
        Ok(stats)
    }

    /// One incremental: drift, draw, soft cap, emit, apply, recover
    fn step(&mut self) -> Result<(), GeneratorError> {
        self.drift_midpoint();

        let mut mutation = self.draw_mutation();
        self.apply_soft_cap(&mut mutation);

        self.emitter.emit(MarketEvent::Incremental {
            side: mutation.side,
            price: mutation.price,
            qty: mutation.qty,
            action: mutation.action,
        })?;
        self.emitter.advance_seq();
        self.stats.incrementals += 1;

        let outcome =
            self.book
                .apply_incremental(mutation.side, mutation.price, mutation.qty, mutation.action);
        if let MutationOutcome::Anomaly(kind) = outcome {
            self.stats.anomalies += 1;
            trace!("Anomalous incremental {:?}: {:?}", mutation, kind);
        }

        if !self.book.is_live() {
            debug!(
                "Book side ran empty at seq {}; rebuilding around {}",
                self.emitter.seq(),
                self.book.midpoint()
            );
            self.initialize();
            self.stats.recoveries += 1;
        }
        Ok(())
    }

    fn drift_midpoint(&mut self) {
        if self.rng.r#gen::<f64>() < self.config.p_mid_move {
            let ticks = self.rng.gen_range(-1i64..=1);
            if ticks != 0 {
                self.book.shift_midpoint(ticks, self.params.tick_size);
                self.stats.mid_moves += 1;
                trace!("Midpoint moved to {}", self.book.midpoint());
            }
        }
    }

    fn draw_mutation(&mut self) -> Mutation {
        let r = self.rng.r#gen::<f64>();
        let action = if r < self.weights.new {
            Action::New
        } else if r < self.weights.new + self.weights.change {
            Action::Change
        } else {
            Action::Delete
        };

        if action == Action::New {
            return self.draw_new();
        }

        // Both sides empty cannot survive a step, but stay total anyway
        let Some((side, price)) = self.pick_existing_level() else {
            return self.draw_new();
        };
        let qty = match action {
            Action::Delete => 0,
            _ => self.params.random_qty(&mut self.rng),
        };
        Mutation {
            side,
            price,
            qty,
            action,
        }
    }

    fn draw_new(&mut self) -> Mutation {
        let side = if self.rng.gen_bool(0.5) {
            Side::Bid
        } else {
            Side::Ask
        };
        let price = self.next_new_price(side);
        let qty = self.params.random_qty(&mut self.rng);
        Mutation {
            side,
            price,
            qty,
            action: Action::New,
        }
    }

    /// One tick beyond the worst level of `side`, or next to the midpoint when
    /// the side is empty
    fn next_new_price(&self, side: Side) -> i64 {
        let tick = self.params.tick_size;
        match (side, self.book.side(side).worst_price(side)) {
            (Side::Bid, Some(worst)) => worst - tick,
            (Side::Ask, Some(worst)) => worst + tick,
            (Side::Bid, None) => self.book.midpoint() - tick,
            (Side::Ask, None) => self.book.midpoint() + tick,
        }
    }

    /// Uniform side among non-empty sides, then uniform price on that side
    fn pick_existing_level(&mut self) -> Option<(Side, i64)> {
        let candidates: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|side| !self.book.side(*side).is_empty())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let side = candidates[self.rng.gen_range(0..candidates.len())];
        let price = choose_key(&mut self.rng, self.book.side(side).levels())?;
        Some((side, price))
    }

    /// Force deletes on sides deeper than `max_depth_soft`.
    ///
    /// Bid is checked first, then ask; when both fire, the ask delete
    /// replaces the bid delete.
    fn apply_soft_cap(&mut self, mutation: &mut Mutation) {
        let mut overridden = false;
        for side in Side::BOTH {
            let levels = self.book.side(side).levels();
            if levels.len() > self.config.max_depth_soft
                && self.rng.r#gen::<f64>() < SOFT_CAP_DELETE_PROBABILITY
            {
                if let Some(price) = choose_key(&mut self.rng, levels) {
                    *mutation = Mutation {
                        side,
                        price,
                        qty: 0,
                        action: Action::Delete,
                    };
                    overridden = true;
                }
            }
        }
        if overridden {
            self.stats.soft_cap_overrides += 1;
        }
    }
}

//! Flat trade-tick stream driven by a random walk of one midpoint

use super::error::GeneratorError;
use super::event::Side;
use super::sink::EventSink;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use tracing::info;

/// Header row of a tick stream
pub const TICK_HEADER: &str = "ts_ns,side,price,qty";

/// Inclusive quantity range of generated ticks
const TICK_QTY_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Parameters of a tick stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub seed: u64,
    /// Number of ticks to produce
    pub n: u64,
    pub start_ts: i64,
    pub dt_ns: i64,
    /// Starting midpoint
    pub base_price: i64,
    /// Distance between the bid and ask trade prices
    pub spread: i64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n: 1_000_000,
            start_ts: 1_700_000_000_000_000_000,
            dt_ns: 1_000,
            base_price: 100_000,
            spread: 100,
        }
    }
}

impl TickConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.dt_ns <= 0 {
            return Err(GeneratorError::invalid("dt_ns", "must be > 0"));
        }
        if self.spread < 0 {
            return Err(GeneratorError::invalid("spread", "must be >= 0"));
        }
        if !matches!(self.base_price.checked_sub(self.spread / 2), Some(bid) if bid >= 1) {
            return Err(GeneratorError::invalid(
                "base_price",
                "must leave the bid price positive",
            ));
        }
        // The walk moves at most one per tick, upwards included
        let steps = i64::try_from(self.n).ok();
        let highest_ask = steps
            .and_then(|n| self.base_price.checked_add(n))
            .and_then(|mid| mid.checked_add(self.spread / 2));
        if highest_ask.is_none() {
            return Err(GeneratorError::invalid(
                "base_price",
                "prices reachable by the walk would overflow i64",
            ));
        }
        let last_ts = steps
            .and_then(|n| n.checked_mul(self.dt_ns))
            .and_then(|span| self.start_ts.checked_add(span));
        if last_ts.is_none() {
            return Err(GeneratorError::invalid(
                "start_ts",
                "clock would overflow i64 before the last tick",
            ));
        }
        Ok(())
    }

    /// Lowest midpoint that keeps both trade prices positive
    fn min_mid(&self) -> i64 {
        self.spread / 2 + 1
    }
}

/// One trade print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub ts_ns: i64,
    pub side: Side,
    pub price: i64,
    pub qty: i64,
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.ts_ns, self.side, self.price, self.qty)
    }
}

/// Seeded tick stream; iterate it or write it to a sink
pub struct TickGenerator {
    config: TickConfig,
    rng: ChaCha8Rng,
    ts_ns: i64,
    mid: i64,
    produced: u64,
}

impl TickGenerator {
    pub fn new(config: TickConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ts_ns: config.start_ts,
            mid: config.base_price,
            produced: 0,
            config,
        })
    }

    /// Current midpoint of the walk
    pub fn midpoint(&self) -> i64 {
        self.mid
    }

    /// Write the header and every remaining tick, returning how many were written
    pub fn write_to<S: EventSink>(self, sink: &mut S) -> Result<u64, GeneratorError> {
        sink.write_record(TICK_HEADER)?;
        let mut written = 0u64;
        let mut line = String::with_capacity(48);
        for tick in self {
            line.clear();
            write!(line, "{}", tick)?;
            sink.write_record(&line)?;
            written += 1;
        }
        sink.flush()?;
        info!("Generated {} ticks", written);
        Ok(written)
    }
}

impl Iterator for TickGenerator {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.produced >= self.config.n {
            return None;
        }

        let step = self.rng.gen_range(-1i64..=1);
        self.mid = (self.mid + step).max(self.config.min_mid());

        let half = self.config.spread / 2;
        let (side, price) = if self.rng.gen_bool(0.5) {
            (Side::Bid, self.mid - half)
        } else {
            (Side::Ask, self.mid + half)
        };
        let qty = self.rng.gen_range(TICK_QTY_RANGE);

        let tick = Tick {
            ts_ns: self.ts_ns,
            side,
            price,
            qty,
        };
        self.ts_ns += self.config.dt_ns;
        self.produced += 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.config.n - self.produced) as usize;
        (remaining, Some(remaining))
    }
}

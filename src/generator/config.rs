//! Generation parameters

use super::book::BookParams;
use super::error::GeneratorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a market-data event stream.
///
/// Every field has a default, so a JSON file only needs the fields it
/// overrides. Same configuration (seed included) always yields the same
/// stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed of the generator's random source
    pub seed: u64,

    /// Timestamp of the first emitted line, in nanoseconds
    pub start_ts: i64,

    /// Clock step per emitted line, in nanoseconds
    pub dt_ns: i64,

    /// Sequence number of the first snapshot block
    pub start_seq: u64,

    /// Initial midpoint price
    pub base_mid: i64,

    /// Minimum price increment
    pub tick_size: i64,

    /// Levels per side when the book is (re)built
    pub init_depth: usize,

    /// Inclusive lower bound for quantities
    pub qty_min: i64,

    /// Inclusive upper bound for quantities
    pub qty_max: i64,

    /// Distance between best bid and best ask at (re)build, in ticks
    pub spread_ticks: i64,

    /// Total number of incremental events to produce
    pub events: u64,

    /// Incrementals between two snapshot blocks
    pub snapshot_every: u64,

    /// Levels per side written in a snapshot; `None` means `init_depth`
    pub snapshot_depth: Option<usize>,

    /// Depth above which deletes are forced on a side
    pub max_depth_soft: usize,

    /// Relative weight of `New` incrementals
    pub p_new: f64,

    /// Relative weight of `Change` incrementals
    pub p_change: f64,

    /// Relative weight of `Delete` incrementals
    pub p_delete: f64,

    /// Probability per incremental that the midpoint drifts
    pub p_mid_move: f64,

    /// Skip sequence numbers every this many incrementals; 0 disables gaps
    pub gap_every: u64,

    /// Sequence numbers skipped per gap (at least one)
    pub gap_size: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_ts: 1_700_000_000_000_000_000,
            dt_ns: 1_000,
            start_seq: 100,
            base_mid: 100_000,
            tick_size: 1,
            init_depth: 200,
            qty_min: 1,
            qty_max: 20,
            spread_ticks: 2,
            events: 1_000_000,
            snapshot_every: 20_000,
            snapshot_depth: None,
            max_depth_soft: 400,
            p_new: 0.10,
            p_change: 0.80,
            p_delete: 0.10,
            p_mid_move: 0.02,
            gap_every: 0,
            gap_size: 1,
        }
    }
}

/// `New`/`Change`/`Delete` probabilities normalized to sum to one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionWeights {
    pub new: f64,
    pub change: f64,
    pub delete: f64,
}

impl ActionWeights {
    /// Normalize three relative weights; their sum must be positive
    pub fn normalized(new: f64, change: f64, delete: f64) -> Result<Self, GeneratorError> {
        for (field, value) in [("p_new", new), ("p_change", change), ("p_delete", delete)] {
            if !value.is_finite() {
                return Err(GeneratorError::invalid(field, "must be a finite number"));
            }
        }
        let total = new + change + delete;
        if total <= 0.0 {
            return Err(GeneratorError::invalid(
                "p_new/p_change/p_delete",
                "must sum to > 0",
            ));
        }
        Ok(Self {
            new: new / total,
            change: change / total,
            delete: delete / total,
        })
    }
}

impl GeneratorConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, GeneratorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every parameter and return the normalized action weights
    pub fn validate(&self) -> Result<ActionWeights, GeneratorError> {
        if self.tick_size <= 0 {
            return Err(GeneratorError::invalid("tick_size", "must be > 0"));
        }
        if self.spread_ticks <= 0 {
            return Err(GeneratorError::invalid("spread_ticks", "must be > 0"));
        }
        if self.init_depth == 0 {
            return Err(GeneratorError::invalid("init_depth", "must be > 0"));
        }
        if self.snapshot_depth == Some(0) {
            return Err(GeneratorError::invalid("snapshot_depth", "must be > 0"));
        }
        if self.snapshot_every == 0 {
            return Err(GeneratorError::invalid("snapshot_every", "must be > 0"));
        }
        if self.dt_ns <= 0 {
            return Err(GeneratorError::invalid("dt_ns", "must be > 0"));
        }
        if self.qty_min <= 0 {
            return Err(GeneratorError::invalid("qty_min", "must be > 0"));
        }
        if self.qty_max < self.qty_min {
            return Err(GeneratorError::invalid(
                "qty_max",
                format!("must be >= qty_min ({})", self.qty_min),
            ));
        }
        if !self.p_mid_move.is_finite() {
            return Err(GeneratorError::invalid("p_mid_move", "must be a finite number"));
        }
        if self.final_timestamp().is_none() {
            return Err(GeneratorError::invalid(
                "start_ts",
                "clock would overflow i64 before the run ends",
            ));
        }
        if self.final_sequence().is_none() {
            return Err(GeneratorError::invalid(
                "start_seq",
                "sequence would overflow u64 before the run ends",
            ));
        }
        if self.price_reach().is_none() {
            return Err(GeneratorError::invalid(
                "base_mid",
                "prices reachable from base_mid would overflow i64",
            ));
        }
        ActionWeights::normalized(self.p_new, self.p_change, self.p_delete)
    }

    /// Snapshot blocks `run` writes: the initial one plus one per non-final chunk
    fn snapshot_count(&self) -> u64 {
        self.events.div_ceil(self.snapshot_every).max(1)
    }

    /// Upper bound on the lines `run` writes, header excluded
    fn max_lines(&self) -> Option<u64> {
        let depth = u64::try_from(self.effective_snapshot_depth()).ok()?;
        let per_snapshot = depth.checked_mul(2)?.checked_add(2)?;
        self.snapshot_count()
            .checked_mul(per_snapshot)?
            .checked_add(self.events)
    }

    /// Clock value after the last line of `run`
    fn final_timestamp(&self) -> Option<i64> {
        let lines = i64::try_from(self.max_lines()?).ok()?;
        self.start_ts.checked_add(lines.checked_mul(self.dt_ns)?)
    }

    /// Sequence number after the last event of `run`, gaps included
    fn final_sequence(&self) -> Option<u64> {
        let gaps = match self.gap_every {
            0 => 0,
            every => self.events / every,
        };
        self.start_seq
            .checked_add(self.snapshot_count())?
            .checked_add(self.events)?
            .checked_add(gaps.checked_mul(self.effective_gap_size())?)
    }

    /// Largest distance from `base_mid` any price can reach during `run`.
    ///
    /// The midpoint drifts at most one tick per incremental, a rebuild spans
    /// the half spread plus `init_depth` ticks, and each `New` extends a side
    /// by one tick.
    fn price_reach(&self) -> Option<i64> {
        let half = (self.spread_ticks / 2).max(1);
        let events = i64::try_from(self.events).ok()?;
        let reach = i64::try_from(self.init_depth)
            .ok()?
            .checked_add(half)?
            .checked_add(events.checked_mul(2)?)?
            .checked_mul(self.tick_size)?;
        self.base_mid.checked_add(reach)?;
        self.base_mid.checked_sub(reach)?;
        Some(reach)
    }

    /// Levels per side written in each snapshot block
    pub fn effective_snapshot_depth(&self) -> usize {
        self.snapshot_depth.unwrap_or(self.init_depth)
    }

    /// Sequence numbers skipped per gap
    pub fn effective_gap_size(&self) -> u64 {
        self.gap_size.max(1)
    }

    pub fn book_params(&self) -> BookParams {
        BookParams {
            tick_size: self.tick_size,
            spread_ticks: self.spread_ticks,
            depth: self.init_depth,
            qty_min: self.qty_min,
            qty_max: self.qty_max,
        }
    }
}

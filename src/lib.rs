//! # Synthetic Limit Order Book Event Streams
//!
//! A deterministic generator of limit-order-book market data, written in Rust. It produces the kind of
//! stream an exchange feed handler delivers (periodic full snapshots interleaved with per-level
//! `New` / `Change` / `Delete` incrementals) so that book-reconstruction and backtesting tools can be
//! tested against realistic, reproducible input.
//!
//! ## Key Features
//!
//! - **Deterministic**: all randomness comes from one seeded ChaCha stream owned by the generator.
//!   The same configuration and seed always produce byte-identical output.
//!
//! - **Stateful**: the generator keeps its own aggregated book (price to quantity per side) and applies
//!   every mutation it emits, so incrementals always refer to levels that exist and new levels always
//!   extend the book outward from its current edges.
//!
//! - **Resync testing**: snapshot blocks share one sequence number, incrementals consume one each, and
//!   sequence gaps can be injected on purpose to exercise out-of-sync detection.
//!
//! - **Liveness**: a side that runs empty is rebuilt around the drifting midpoint straight away, and a
//!   soft depth cap keeps either side from growing without bound.
//!
//! - **Reference consumer**: [`BookBuilder`] replays a stream the way a downstream consumer should,
//!   tracking gaps, stale sequence numbers, crossed books and anomalous mutations.
//!
//! ## Stream Format
//!
//! One header row followed by one record per line:
//!
//! ```text
//! ts_ns,seq,kind,side,price,qty,action
//! 1700000000000000000,100,SB,,,,
//! 1700000000000001000,100,SL,B,99999,7,
//! 1700000000000002000,100,SL,A,100001,3,
//! 1700000000000003000,100,SE,,,,
//! 1700000000000004000,101,I,B,99998,12,N
//! ```
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `ts_ns` | Timestamp in nanoseconds, advancing by a fixed step per line |
//! | `seq` | Sequence number, shared by all lines of a snapshot block |
//! | `kind` | `SB` snapshot begin, `SL` snapshot level, `SE` snapshot end, `I` incremental |
//! | `side` | `B` or `A`; empty for `SB`/`SE` |
//! | `price`, `qty` | Integers; empty for `SB`/`SE` |
//! | `action` | `N`, `C` or `D` for incrementals; empty otherwise |
//!
//! ## Usage
//!
//! ```rust
//! use lobstream_rs::{GeneratorConfig, LobEventGenerator};
//!
//! let config = GeneratorConfig {
//!     events: 1_000,
//!     snapshot_every: 250,
//!     init_depth: 10,
//!     ..GeneratorConfig::default()
//! };
//!
//! let mut generator = LobEventGenerator::new(config, Vec::<String>::new()).unwrap();
//! let stats = generator.run().unwrap();
//! assert_eq!(stats.incrementals, 1_000);
//! assert_eq!(stats.snapshots, 4);
//!
//! let lines = generator.into_sink();
//! assert_eq!(lines[0], "ts_ns,seq,kind,side,price,qty,action");
//! ```
//!
//! Writing to a file goes through [`CsvSink`]; the `demos` workspace member wraps all of this in
//! command-line tools (`gen_md_events`, `gen_ticks`, `replay_md_events`).
//!
//! ## Incremental Policy
//!
//! Each incremental step:
//!
//! 1. Optionally drifts the midpoint by one tick (`p_mid_move`).
//! 2. Draws `New`, `Change` or `Delete` from the normalized `p_new` / `p_change` / `p_delete` weights.
//!    `New` creates a level one tick beyond the worst level of a random side; `Change` and `Delete`
//!    pick an existing level uniformly.
//! 3. If a side is deeper than `max_depth_soft`, forces a delete there with probability 0.7
//!    (bid checked first, then ask; an ask override replaces a bid override).
//! 4. Emits the incremental, then applies it to the internal book.
//! 5. Rebuilds the whole book if either side is now empty. The rebuild is not announced in the stream.
//!
//! ## Status
//! The generator aims for plausible, not realistic, order flow. There is no matching, no order IDs and
//! no participant model.

pub mod generator;

mod utils;

pub use generator::{
    BookBuilder, CsvSink, EventSink, GeneratorConfig, GeneratorError, GeneratorStats,
    LobEventGenerator, TickConfig, TickGenerator,
};

//! Book-state simulation and market-data event emission.

pub mod book;
pub mod config;
pub mod emitter;
mod error;
pub mod event;
pub mod lob;
pub mod replay;
pub mod sink;
pub mod ticks;

pub use book::{Anomaly, Book, BookParams, BookSide, MutationOutcome, Top};
pub use config::{ActionWeights, GeneratorConfig};
pub use emitter::EventEmitter;
pub use error::GeneratorError;
pub use event::{Action, EventRecord, HEADER, MarketEvent, Side};
pub use lob::{GeneratorStats, LobEventGenerator};
pub use replay::{BookBuilder, BuildState, BuilderStats};
pub use sink::{CsvSink, EventSink};
pub use ticks::{TICK_HEADER, Tick, TickConfig, TickGenerator};

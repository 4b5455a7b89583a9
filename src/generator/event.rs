//! Market-data event records and their CSV line format.
//!
//! Each emitted line has the layout given by [`HEADER`]:
//! `ts_ns,seq,kind,side,price,qty,action`. Fields that do not apply to a
//! record kind are left empty, so a snapshot marker looks like
//! `1700000000000000000,100,SB,,,,`.

use super::error::GeneratorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header row written once at the top of every event stream
pub const HEADER: &str = "ts_ns,seq,kind,side,price,qty,action";

/// Side of the book a level belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Resting buy interest
    Bid,
    /// Resting sell interest
    Ask,
}

impl Side {
    /// Both sides, bid first
    pub const BOTH: [Side; 2] = [Side::Bid, Side::Ask];

    /// Single-letter tag used in the CSV stream
    pub fn code(self) -> &'static str {
        match self {
            Side::Bid => "B",
            Side::Ask => "A",
        }
    }

    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" | "Bid" | "bid" => Ok(Side::Bid),
            "A" | "Ask" | "ask" => Ok(Side::Ask),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

/// Mutation carried by an incremental record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// A level appears
    New,
    /// A level's quantity is replaced
    Change,
    /// A level disappears
    Delete,
}

impl Action {
    pub fn code(self) -> &'static str {
        match self {
            Action::New => "N",
            Action::Change => "C",
            Action::Delete => "D",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Action::New),
            "C" => Ok(Action::Change),
            "D" => Ok(Action::Delete),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// A single logical market-data event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// Opens a snapshot block
    SnapshotBegin,

    /// One level inside a snapshot block
    SnapshotLevel {
        side: Side,
        price: i64,
        qty: i64,
    },

    /// Closes a snapshot block
    SnapshotEnd,

    /// A single level mutation
    Incremental {
        side: Side,
        price: i64,
        qty: i64,
        action: Action,
    },
}

impl MarketEvent {
    /// Tag written in the `kind` column
    pub fn kind_code(&self) -> &'static str {
        match self {
            MarketEvent::SnapshotBegin => "SB",
            MarketEvent::SnapshotLevel { .. } => "SL",
            MarketEvent::SnapshotEnd => "SE",
            MarketEvent::Incremental { .. } => "I",
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            MarketEvent::SnapshotLevel { side, .. } | MarketEvent::Incremental { side, .. } => {
                Some(*side)
            }
            _ => None,
        }
    }
}

/// An event stamped with the timestamp and sequence number it was emitted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Emission timestamp in nanoseconds
    pub ts_ns: i64,

    /// Logical sequence number; shared by every line of a snapshot block
    pub seq: u64,

    /// The event itself
    pub event: MarketEvent,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},", self.ts_ns, self.seq, self.event.kind_code())?;
        match self.event {
            MarketEvent::SnapshotBegin | MarketEvent::SnapshotEnd => f.write_str(",,,"),
            MarketEvent::SnapshotLevel { side, price, qty } => {
                write!(f, "{},{},{},", side, price, qty)
            }
            MarketEvent::Incremental {
                side,
                price,
                qty,
                action,
            } => write!(f, "{},{},{},{}", side, price, qty, action),
        }
    }
}

fn required<'a>(line: &str, name: &str, value: &'a str) -> Result<&'a str, GeneratorError> {
    if value.is_empty() {
        Err(GeneratorError::malformed(line, format!("missing {}", name)))
    } else {
        Ok(value)
    }
}

fn parse_int<T: FromStr>(line: &str, name: &str, value: &str) -> Result<T, GeneratorError> {
    required(line, name, value)?
        .parse()
        .map_err(|_| GeneratorError::malformed(line, format!("invalid {} '{}'", name, value)))
}

impl FromStr for EventRecord {
    type Err = GeneratorError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() != 7 {
            return Err(GeneratorError::malformed(
                trimmed,
                format!("expected 7 fields, found {}", fields.len()),
            ));
        }

        let ts_ns = parse_int(trimmed, "ts_ns", fields[0])?;
        let seq = parse_int(trimmed, "seq", fields[1])?;

        let event = match fields[2] {
            "SB" => MarketEvent::SnapshotBegin,
            "SE" => MarketEvent::SnapshotEnd,
            "SL" | "I" => {
                let side = required(trimmed, "side", fields[3])?
                    .parse::<Side>()
                    .map_err(|e| GeneratorError::malformed(trimmed, e))?;
                let price = parse_int(trimmed, "price", fields[4])?;
                let qty = parse_int(trimmed, "qty", fields[5])?;
                if fields[2] == "SL" {
                    MarketEvent::SnapshotLevel { side, price, qty }
                } else {
                    let action = required(trimmed, "action", fields[6])?
                        .parse::<Action>()
                        .map_err(|e| GeneratorError::malformed(trimmed, e))?;
                    MarketEvent::Incremental {
                        side,
                        price,
                        qty,
                        action,
                    }
                }
            }
            other => {
                return Err(GeneratorError::malformed(
                    trimmed,
                    format!("unknown kind '{}'", other),
                ));
            }
        };

        Ok(EventRecord { ts_ns, seq, event })
    }
}

//! Aggregated price-level book used by the generator and the replay builder

use super::event::{Action, Side};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::trace;

/// One side of the book: price to strictly positive quantity.
///
/// A level whose quantity would drop to zero or below is removed instead of
/// being stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSide {
    levels: BTreeMap<i64, i64>,
}

impl BookSide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest price for the bid side, lowest for the ask side
    pub fn best_price(&self, side: Side) -> Option<i64> {
        match side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    /// Lowest price for the bid side, highest for the ask side
    pub fn worst_price(&self, side: Side) -> Option<i64> {
        match side {
            Side::Bid => self.levels.keys().next().copied(),
            Side::Ask => self.levels.keys().next_back().copied(),
        }
    }

    /// All prices in best-to-worst order (descending for bids, ascending for asks)
    pub fn prices_sorted(&self, side: Side) -> Vec<i64> {
        match side {
            Side::Bid => self.levels.keys().rev().copied().collect(),
            Side::Ask => self.levels.keys().copied().collect(),
        }
    }

    /// Quantity resting at `price`, if the level exists
    pub fn get(&self, price: i64) -> Option<i64> {
        self.levels.get(&price).copied()
    }

    pub fn contains(&self, price: i64) -> bool {
        self.levels.contains_key(&price)
    }

    /// Number of levels (depth) on this side
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels in ascending price order
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.levels.iter().map(|(price, qty)| (*price, *qty))
    }

    pub(crate) fn levels(&self) -> &BTreeMap<i64, i64> {
        &self.levels
    }

    pub(crate) fn set(&mut self, price: i64, qty: i64) {
        if qty > 0 {
            self.levels.insert(price, qty);
        } else {
            self.levels.remove(&price);
        }
    }

    pub(crate) fn remove(&mut self, price: i64) -> Option<i64> {
        self.levels.remove(&price)
    }

    pub(crate) fn clear(&mut self) {
        self.levels.clear();
    }
}

/// Parameters used to (re)build a symmetric book around the midpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookParams {
    /// Minimum price increment between adjacent levels
    pub tick_size: i64,
    /// Distance between best bid and best ask, in ticks
    pub spread_ticks: i64,
    /// Number of levels per side
    pub depth: usize,
    /// Inclusive lower bound for level quantities
    pub qty_min: i64,
    /// Inclusive upper bound for level quantities
    pub qty_max: i64,
}

impl BookParams {
    /// Draws a quantity uniformly from `[qty_min, qty_max]`
    pub fn random_qty<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.qty_min..=self.qty_max)
    }
}

/// Why an incremental did not match the book it was applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// `New` for a price that already has a level
    NewOnExistingLevel,
    /// `New` with a quantity of zero or less
    NonPositiveNewQuantity,
    /// `Change` for a price without a level
    ChangeOnMissingLevel,
    /// `Delete` for a price without a level
    DeleteOnMissingLevel,
}

/// Result of applying an incremental to a book.
///
/// An anomaly is a diagnostic, not a failure: the book has already been
/// patched as far as the rules allow.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Anomaly(Anomaly),
}

impl MutationOutcome {
    pub fn is_anomaly(&self) -> bool {
        matches!(self, MutationOutcome::Anomaly(_))
    }
}

/// Best bid and best ask of a two-sided book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Top {
    pub bid_price: i64,
    pub bid_qty: i64,
    pub ask_price: i64,
    pub ask_qty: i64,
}

impl Top {
    /// True when the best bid is at or above the best ask
    pub fn is_crossed(&self) -> bool {
        self.bid_price >= self.ask_price
    }
}

/// Two-sided aggregated book plus the midpoint it is seeded from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    bids: BookSide,
    asks: BookSide,
    mid: i64,
}

impl Book {
    /// Create an empty book anchored at `mid`
    pub fn new(mid: i64) -> Self {
        Self {
            bids: BookSide::new(),
            asks: BookSide::new(),
            mid,
        }
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn midpoint(&self) -> i64 {
        self.mid
    }

    /// Moves the midpoint by `ticks * tick_size`; levels are left untouched
    pub(crate) fn shift_midpoint(&mut self, ticks: i64, tick_size: i64) {
        self.mid += ticks * tick_size;
    }

    /// Both sides have at least one level
    pub fn is_live(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty()
    }

    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Destructively rebuilds a symmetric book around the current midpoint.
    ///
    /// With `half = max(1, spread_ticks / 2)`, the best bid sits at
    /// `mid - half * tick` and the best ask at `mid + half * tick`; each side
    /// then extends `depth` levels outward one tick apart, every level with an
    /// independently drawn quantity (bid then ask, level by level).
    pub fn reinitialize<R: Rng + ?Sized>(&mut self, params: &BookParams, rng: &mut R) {
        let half = (params.spread_ticks / 2).max(1);
        let best_bid = self.mid - half * params.tick_size;
        let best_ask = self.mid + half * params.tick_size;

        self.clear();

        for i in 0..params.depth as i64 {
            let bid_price = best_bid - i * params.tick_size;
            let ask_price = best_ask + i * params.tick_size;
            let bid_qty = params.random_qty(rng);
            let ask_qty = params.random_qty(rng);
            self.bids.set(bid_price, bid_qty);
            self.asks.set(ask_price, ask_qty);
        }

        trace!(
            "Book reinitialized around {}: {} levels per side, best {} / {}",
            self.mid, params.depth, best_bid, best_ask
        );
    }

    /// Applies one snapshot level; a quantity of zero or less removes the level
    pub fn apply_snapshot_level(&mut self, side: Side, price: i64, qty: i64) {
        self.side_mut(side).set(price, qty);
    }

    /// Applies an incremental mutation using lenient rules:
    ///
    /// - `New`: anomaly if the level exists; a positive quantity is written
    ///   anyway, a non-positive one is an anomaly and changes nothing.
    /// - `Change`: anomaly if the level is missing; a non-positive quantity
    ///   removes an existing level, otherwise the quantity is overwritten.
    /// - `Delete`: anomaly if the level is missing; otherwise it is removed
    ///   whatever quantity was supplied.
    pub fn apply_incremental(
        &mut self,
        side: Side,
        price: i64,
        qty: i64,
        action: Action,
    ) -> MutationOutcome {
        let levels = self.side_mut(side);
        let exists = levels.contains(price);

        let mut anomaly = None;
        match action {
            Action::New => {
                if exists {
                    anomaly = Some(Anomaly::NewOnExistingLevel);
                }
                if qty > 0 {
                    levels.set(price, qty);
                } else {
                    anomaly = Some(Anomaly::NonPositiveNewQuantity);
                }
            }
            Action::Change => {
                if !exists {
                    anomaly = Some(Anomaly::ChangeOnMissingLevel);
                }
                if qty <= 0 {
                    levels.remove(price);
                } else {
                    levels.set(price, qty);
                }
            }
            Action::Delete => {
                if exists {
                    levels.remove(price);
                } else {
                    anomaly = Some(Anomaly::DeleteOnMissingLevel);
                }
            }
        }

        match anomaly {
            Some(kind) => MutationOutcome::Anomaly(kind),
            None => MutationOutcome::Applied,
        }
    }

    /// Best bid and best ask, if both sides have levels
    pub fn top(&self) -> Option<Top> {
        let bid_price = self.bids.best_price(Side::Bid)?;
        let ask_price = self.asks.best_price(Side::Ask)?;
        Some(Top {
            bid_price,
            bid_qty: self.bids.get(bid_price).unwrap_or_default(),
            ask_price,
            ask_qty: self.asks.get(ask_price).unwrap_or_default(),
        })
    }

    /// True when both books hold exactly the same levels, whatever their midpoints
    pub fn same_levels(&self, other: &Book) -> bool {
        self.bids == other.bids && self.asks == other.asks
    }
}

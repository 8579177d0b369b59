//! Floor and top-bid snapshot for a collection.

use serde::{Deserialize, Serialize};

/// PriceQuote is the floor/top-bid pair observed on one marketplace.
/// Both prices are in the chain's native unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Lowest listed sale price.
    pub floor: f64,
    /// Highest standing offer.
    pub top_bid: f64,
}

impl PriceQuote {
    /// Creates a new PriceQuote.
    pub fn new(floor: f64, top_bid: f64) -> Self {
        Self { floor, top_bid }
    }

    /// Builds a quote from observed listing prices: floor is the minimum,
    /// top bid the maximum. Returns None when there are no prices.
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        let (first, rest) = prices.split_first()?;
        let (floor, top_bid) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(Self { floor, top_bid })
    }

    /// Returns the difference `self - other` for floor and top bid.
    pub fn diff(&self, other: &PriceQuote) -> (f64, f64) {
        (self.floor - other.floor, self.top_bid - other.top_bid)
    }
}

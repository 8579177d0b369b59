//! Competitive re-listing price rule.

use serde::{Deserialize, Serialize};

/// Minimum relative move that justifies a new listing price (0.1%).
pub const DEADBAND: f64 = 0.001;

/// Listings are never placed at or below the best bid plus this margin.
pub const TOP_BID_GUARD: f64 = 1.001;

/// Lower bound for the deadband denominator.
const MIN_PRICE: f64 = 1e-9;

/// Strategy selects how the target listing price is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Undercut the reference floor by the margin, but stay above the top bid.
    #[default]
    UndercutFloor,
    /// List the margin above the reference top bid.
    AboveTopBid,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::UndercutFloor => write!(f, "undercut_floor"),
            Strategy::AboveTopBid => write!(f, "above_top_bid"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undercut_floor" => Ok(Strategy::UndercutFloor),
            "above_top_bid" => Ok(Strategy::AboveTopBid),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}

/// Computes the price a listing should move to.
///
/// Returns `current_price` untouched when the computed target is within
/// [`DEADBAND`] of it, otherwise the target rounded to 6 decimals.
pub fn compute_target_price(
    floor: f64,
    top_bid: f64,
    current_price: f64,
    margin_pct: f64,
    strategy: Strategy,
) -> f64 {
    let target = match strategy {
        Strategy::AboveTopBid => top_bid * (1.0 + margin_pct),
        Strategy::UndercutFloor => {
            let undercut = floor * (1.0 - margin_pct);
            undercut.max(top_bid * TOP_BID_GUARD)
        }
    };

    if (target - current_price).abs() / current_price.max(MIN_PRICE) < DEADBAND {
        return current_price;
    }

    round_to_micros(target)
}

fn round_to_micros(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

//! Domain models for collection prices and re-listing decisions.

mod pricing;
mod quote;

pub use pricing::{Strategy, compute_target_price};
pub use quote::PriceQuote;

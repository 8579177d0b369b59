//! Per-collection and per-cycle sync results.

use crate::domain::PriceQuote;

/// What one collection sync observed.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub slug: String,
    /// Reference marketplace (Drip.Trade) quote.
    pub reference: Option<PriceQuote>,
    /// Quote derived from our own listings (LiquidLoot).
    pub listings: Option<PriceQuote>,
    /// Re-listing price the strategy would apply. Never sent anywhere.
    pub target_price: Option<f64>,
}

/// Aggregate outcome of one pass over all collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub synced: u64,
    pub failed: u64,
    /// Failures caused by retryable transport errors.
    pub transport_failures: u64,
    pub without_listings: u64,
}

impl CycleReport {
    pub(crate) fn record_success(&mut self, report: &SyncReport) {
        self.synced += 1;
        if report.listings.is_none() {
            self.without_listings += 1;
        }
    }

    pub(crate) fn record_failure(&mut self, retryable: bool) {
        self.failed += 1;
        if retryable {
            self.transport_failures += 1;
        }
    }

    /// True when every collection failed on transport, which points at an
    /// unreachable marketplace rather than bad data.
    pub fn all_transport_failures(&self) -> bool {
        self.synced == 0 && self.failed > 0 && self.transport_failures == self.failed
    }
}

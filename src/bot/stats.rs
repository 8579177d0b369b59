//! Runtime statistics for the bot.

use chrono::{DateTime, Utc};

use super::report::CycleReport;

/// Runtime statistics for the bot.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub collections_synced: u64,
    pub collections_failed: u64,
    pub collections_without_listings: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
}

impl Stats {
    pub(crate) fn record_cycle(&mut self, report: &CycleReport, failed: bool) {
        self.cycles += 1;
        if failed {
            self.failed_cycles += 1;
        }
        self.collections_synced += report.synced;
        self.collections_failed += report.failed;
        self.collections_without_listings += report.without_listings;
        self.last_cycle_at = Some(Utc::now());
    }
}

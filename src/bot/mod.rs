//! Price sync bot.
//!
//! Polls both marketplaces for every configured collection, logs how they
//! compare and what re-listing price the strategy would pick. The bot is
//! read-only: it never places, updates or cancels listings.

mod config;
mod error;
mod report;
mod stats;

pub use config::BotConfig;
pub use error::BotError;
pub use report::{CycleReport, SyncReport};
pub use stats::Stats;

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::domain::compute_target_price;
use crate::marketplaces::{
    DripClient, HttpClient, LiquidLootClient, Marketplace, MarketplaceError,
};

/// Price sync bot that compares a reference marketplace with our listings.
pub struct Bot {
    cfg: Config,
    reference: Arc<dyn Marketplace>,
    listings: Arc<dyn Marketplace>,

    // Runtime state
    version: String,
    started_at: Mutex<Option<Instant>>,
    running: Mutex<bool>,
    stats: Mutex<Stats>,
}

impl Bot {
    /// Creates a new Bot backed by the Drip.Trade and LiquidLoot clients.
    pub fn new(cfg: BotConfig) -> Result<Self, BotError> {
        let http = HttpClient::new(cfg.app_config.http)?;
        let drip = DripClient::new(&cfg.app_config.drip, http.clone())?;
        let liquidloot = LiquidLootClient::new(&cfg.app_config.liquidloot, http)?;

        Ok(Self::with_marketplaces(
            cfg,
            Arc::new(drip),
            Arc::new(liquidloot),
        ))
    }

    /// Creates a new Bot over arbitrary marketplaces.
    pub fn with_marketplaces(
        cfg: BotConfig,
        reference: Arc<dyn Marketplace>,
        listings: Arc<dyn Marketplace>,
    ) -> Self {
        Bot {
            cfg: cfg.app_config,
            reference,
            listings,
            version: cfg.version,
            started_at: Mutex::new(None),
            running: Mutex::new(false),
            stats: Mutex::new(Stats::default()),
        }
    }

    /// Starts the bot and polls until stopped.
    pub async fn start(&self) -> Result<(), BotError> {
        {
            let mut running = self.running.lock().await;
            if *running {
                return Err(BotError::AlreadyRunning);
            }
            *running = true;
        }

        {
            let mut started_at = self.started_at.lock().await;
            *started_at = Some(Instant::now());
        }

        info!(
            version = %self.version,
            collections = ?self.cfg.collections,
            strategy = %self.cfg.strategy,
            margin_pct = self.cfg.margin_pct,
            interval = ?self.cfg.interval,
            dry_run = self.cfg.dry_run,
            reference = self.reference.name(),
            listings = self.listings.name(),
            "Starting price sync bot"
        );

        if !self.cfg.dry_run {
            warn!("Listing updates are not supported; running read-only despite DRY_RUN=false");
        }

        self.run_main_loop().await
    }

    /// Gracefully stops the bot.
    pub async fn stop(&self) -> Result<(), BotError> {
        {
            let mut running = self.running.lock().await;
            if !*running {
                return Ok(());
            }
            *running = false;
        }

        let uptime = self.uptime().await;
        let stats = self.stats().await;

        info!(
            uptime = ?uptime,
            cycles = stats.cycles,
            failed_cycles = stats.failed_cycles,
            collections_synced = stats.collections_synced,
            collections_failed = stats.collections_failed,
            collections_without_listings = stats.collections_without_listings,
            last_cycle_at = ?stats.last_cycle_at,
            "Bot stopped"
        );

        Ok(())
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// Returns true if the bot is currently running.
    pub async fn is_running(&self) -> bool {
        *self.running.lock().await
    }

    /// Returns how long the bot has been running.
    pub async fn uptime(&self) -> Duration {
        self.started_at
            .lock()
            .await
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Main poll loop. Cycles start `interval` apart; a failed cycle is
    /// followed by a full interval of sleep.
    async fn run_main_loop(&self) -> Result<(), BotError> {
        while self.is_running().await {
            let cycle_start = Instant::now();

            let pause = match self.run_cycle().await {
                Ok(report) => {
                    debug!(
                        synced = report.synced,
                        failed = report.failed,
                        without_listings = report.without_listings,
                        elapsed = ?cycle_start.elapsed(),
                        "Sync cycle finished"
                    );
                    self.cfg.interval.saturating_sub(cycle_start.elapsed())
                }
                Err(e) => {
                    error!(error = %e, retry_in = ?self.cfg.interval, "Sync cycle failed");
                    self.cfg.interval
                }
            };

            tokio::time::sleep(pause).await;
        }

        Ok(())
    }

    /// Runs one pass over all configured collections, in order.
    ///
    /// A failing collection is logged and skipped. The cycle as a whole
    /// fails only when every collection failed on transport.
    pub async fn run_cycle(&self) -> Result<CycleReport, BotError> {
        let mut report = CycleReport::default();

        for slug in &self.cfg.collections {
            match self.sync_collection(slug).await {
                Ok(sync) => report.record_success(&sync),
                Err(e) => {
                    error!(
                        slug = %slug,
                        error = %error_chain(&e),
                        retryable = e.is_retryable(),
                        data_error = e.is_data_error(),
                        "Collection sync failed"
                    );
                    report.record_failure(e.is_retryable());
                }
            }
        }

        let failed = report.all_transport_failures();
        self.stats.lock().await.record_cycle(&report, failed);

        if failed {
            return Err(BotError::CycleFailed(format!(
                "all {} collections failed on transport",
                report.failed
            )));
        }

        Ok(report)
    }

    /// Fetches both quotes for one collection and logs the comparison.
    pub async fn sync_collection(&self, slug: &str) -> Result<SyncReport, MarketplaceError> {
        let reference = self.reference.get_quote(slug).await?;
        match reference {
            Some(q) => info!(
                slug = %slug,
                marketplace = self.reference.name(),
                floor = q.floor,
                top_bid = q.top_bid,
                "Reference prices"
            ),
            None => info!(slug = %slug, marketplace = self.reference.name(), "No reference data"),
        }

        let listings = self.listings.get_quote(slug).await?;
        let mut target_price = None;

        match listings {
            None => {
                info!(
                    slug = %slug,
                    marketplace = self.listings.name(),
                    "No data (no active listings)"
                );
            }
            Some(ours) => {
                info!(
                    slug = %slug,
                    marketplace = self.listings.name(),
                    floor = ours.floor,
                    top_bid = ours.top_bid,
                    "Listing prices"
                );

                if let Some(reference) = reference {
                    let (diff_floor, diff_top_bid) = ours.diff(&reference);
                    info!(
                        slug = %slug,
                        diff_floor = diff_floor,
                        diff_top_bid = diff_top_bid,
                        "Price difference"
                    );

                    let target = compute_target_price(
                        reference.floor,
                        reference.top_bid,
                        ours.floor,
                        self.cfg.margin_pct,
                        self.cfg.strategy,
                    );
                    info!(
                        slug = %slug,
                        current = ours.floor,
                        target = target,
                        changed = target != ours.floor,
                        strategy = %self.cfg.strategy,
                        "Target price computed (not applied)"
                    );
                    target_price = Some(target);
                }
            }
        }

        if self.cfg.dry_run {
            info!(slug = %slug, "Dry run: listings not updated");
        }

        Ok(SyncReport {
            slug: slug.to_string(),
            reference,
            listings,
            target_price,
        })
    }
}

/// Formats an error with all of its sources, outermost first.
fn error_chain(e: &dyn StdError) -> String {
    let mut out = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        // thiserror wrappers often repeat their source's message
        if !out.ends_with(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = cause.source();
    }
    out
}

//! Bot error types.

use crate::marketplaces::MarketplaceError;

/// Bot error type.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("bot is already running")]
    AlreadyRunning,
    #[error("sync cycle failed: {0}")]
    CycleFailed(String),
    #[error("marketplace error: {0}")]
    Marketplace(#[from] MarketplaceError),
}

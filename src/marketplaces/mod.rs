//! Marketplace API clients and the abstraction the sync loop reads through.

mod drip;
mod http;
mod liquidloot;
mod utils;

pub use drip::DripClient;
pub use http::HttpClient;
pub use liquidloot::LiquidLootClient;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::PriceQuote;

/// Marketplace errors.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Transport failure: timeout, connection error, or client misuse.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a 5xx status.
    #[error("server error {status}: {body}")]
    Server { status: StatusCode, body: String },

    /// A non-success status the caller did not accept.
    #[error("{marketplace} api {url} returned {status}: {body}")]
    Status {
        marketplace: String,
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The requested collection is not listed by the marketplace.
    #[error("collection '{slug}' not found on {marketplace}")]
    CollectionNotFound { marketplace: String, slug: String },

    /// The payload parsed but did not have the expected shape or values.
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl MarketplaceError {
    /// Returns true for failures worth retrying: timeouts, connection
    /// errors and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketplaceError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            MarketplaceError::Server { .. } => true,
            _ => false,
        }
    }

    /// Returns true when the marketplace answered but the data was unusable.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            MarketplaceError::CollectionNotFound { .. }
                | MarketplaceError::Malformed(_)
                | MarketplaceError::Json(_)
        )
    }
}

/// Result type for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketplaceError>;

/// Marketplace is a read-only source of collection prices.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// Name used in logs and errors (e.g., "drip").
    fn name(&self) -> &str;

    /// Fetches the floor and top bid for a collection.
    /// Returns None when the marketplace has no price data for it.
    async fn get_quote(&self, slug: &str) -> Result<Option<PriceQuote>>;
}

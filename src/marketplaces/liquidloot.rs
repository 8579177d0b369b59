//! LiquidLoot listings reader.
//!
//! The floor and top bid reported here are derived from the wallet's own
//! active listings: the cheapest and the most expensive native-currency
//! consideration amounts.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::http::{HttpClient, HttpRequest};
use super::utils::{is_native_token, wei_to_native};
use super::{Marketplace, MarketplaceError, Result};
use crate::config::MarketplaceConfig;
use crate::domain::PriceQuote;

const NAME: &str = "liquidloot";

/// Query parameter scoping listings to one wallet.
const OFFERER_PARAM: &str = "offerer_address";

#[derive(Debug, Deserialize)]
struct ListingsResponse {
    data: Option<ListingsData>,
}

#[derive(Debug, Deserialize)]
struct ListingsData {
    listings: Option<Vec<Listing>>,
}

/// An active listing and what it asks in exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    /// Only used in error messages; left untyped since marketplaces
    /// disagree on whether it is a string or a number.
    pub id: Option<Value>,
    pub listing_consideration_items: Option<Vec<ConsiderationItem>>,
}

/// One token amount a listing expects in exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsiderationItem {
    pub token_address: Option<String>,
    /// Base-10 integer with 18 decimals.
    pub end_amount: Option<String>,
}

impl Listing {
    fn display_id(&self) -> String {
        match self.id {
            Some(Value::String(ref id)) => id.clone(),
            Some(ref other) => other.to_string(),
            None => "<unknown>".to_string(),
        }
    }
}

/// Reads the caller's active listings from the LiquidLoot API.
pub struct LiquidLootClient {
    base_url: String,
    wallet_address: Option<String>,
    headers: HeaderMap,
    http: HttpClient,
}

impl LiquidLootClient {
    /// Creates a new client. Listings are scoped to the configured wallet
    /// when one is set.
    pub fn new(config: &MarketplaceConfig, http: HttpClient) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ref api_key) = config.api_key {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", api_key))?);
        }

        Ok(Self {
            base_url: config.base_url.clone(),
            wallet_address: config.wallet_address.clone(),
            headers,
            http,
        })
    }

    /// Fetches active listings. An absent `data` or `listings` key yields
    /// an empty list.
    pub async fn get_my_listings(&self) -> Result<Vec<Listing>> {
        let url = format!("{}/listings", self.base_url);
        let mut request = HttpRequest::get(&url).headers(self.headers.clone());
        if let Some(ref wallet) = self.wallet_address {
            request = request.query(OFFERER_PARAM, wallet);
        }

        let response = self.http.send(&request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MarketplaceError::Status {
                marketplace: NAME.to_string(),
                url,
                status,
                body,
            });
        }

        let payload: ListingsResponse = serde_json::from_str(&body)?;
        Ok(payload
            .data
            .and_then(|d| d.listings)
            .unwrap_or_default())
    }

    /// Returns floor and top bid derived from the wallet's native-currency
    /// listings, or None when there is nothing to derive them from.
    ///
    /// The listings endpoint is not collection-scoped; `slug` is only used
    /// for logging.
    pub async fn get_floor_and_top_bid(&self, slug: &str) -> Result<Option<PriceQuote>> {
        let listings = self.get_my_listings().await?;
        debug!(slug = %slug, listings = listings.len(), "liquidloot listings received");

        if listings.is_empty() {
            return Ok(None);
        }

        let prices = native_prices(&listings)?;
        Ok(PriceQuote::from_prices(&prices))
    }

    /// Returns only the floor of [`get_floor_and_top_bid`](Self::get_floor_and_top_bid).
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn get_floor_price(&self, slug: &str) -> Result<Option<f64>> {
        Ok(self.get_floor_and_top_bid(slug).await?.map(|q| q.floor))
    }
}

/// Collects native-currency end amounts across all listings, in native units.
/// Items in other tokens are skipped.
pub fn native_prices(listings: &[Listing]) -> Result<Vec<f64>> {
    let mut prices = Vec::new();

    for listing in listings {
        let items = listing.listing_consideration_items.as_deref().unwrap_or_default();
        for item in items {
            let Some(ref token) = item.token_address else {
                continue;
            };
            if !is_native_token(token) {
                continue;
            }

            let amount = item.end_amount.as_deref().ok_or_else(|| {
                MarketplaceError::Malformed(format!(
                    "listing {} has a native consideration item without end_amount",
                    listing.display_id()
                ))
            })?;
            prices.push(wei_to_native(amount)?);
        }
    }

    Ok(prices)
}

#[async_trait]
impl Marketplace for LiquidLootClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn get_quote(&self, slug: &str) -> Result<Option<PriceQuote>> {
        self.get_floor_and_top_bid(slug).await
    }
}

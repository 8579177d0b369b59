//! Drip.Trade collection stats reader.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use super::http::{HttpClient, HttpRequest};
use super::utils::parse_bigint;
use super::{Marketplace, MarketplaceError, Result};
use crate::config::MarketplaceConfig;
use crate::domain::PriceQuote;

const NAME: &str = "drip";

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    collections: Vec<CollectionEntry>,
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    #[serde(default)]
    slug: String,
    #[serde(rename = "floorPrice")]
    floor_price: Option<String>,
    #[serde(rename = "topBid")]
    top_bid: Option<String>,
}

/// Reads collection floor and top bid from the Drip.Trade API.
pub struct DripClient {
    base_url: String,
    headers: HeaderMap,
    http: HttpClient,
}

impl DripClient {
    /// Creates a new client; the API key, when set, is sent as a bearer token.
    pub fn new(config: &MarketplaceConfig, http: HttpClient) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ref api_key) = config.api_key {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", api_key))?);
        }

        Ok(Self {
            base_url: config.base_url.clone(),
            headers,
            http,
        })
    }

    /// Fetches floor price and top bid for the collection with the given slug.
    pub async fn get_collection_stats(&self, slug: &str) -> Result<PriceQuote> {
        let url = format!("{}/collections", self.base_url);
        let request = HttpRequest::get(&url).headers(self.headers.clone());

        let response = self.http.send(&request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(MarketplaceError::Status {
                marketplace: NAME.to_string(),
                url,
                status,
                body,
            });
        }

        let payload: CollectionsResponse = serde_json::from_str(&body)?;
        debug!(
            slug = %slug,
            collections = payload.collections.len(),
            "drip collections received"
        );

        find_collection_stats(payload.collections, slug)
    }
}

fn find_collection_stats(collections: Vec<CollectionEntry>, slug: &str) -> Result<PriceQuote> {
    let entry = collections
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| MarketplaceError::CollectionNotFound {
            marketplace: NAME.to_string(),
            slug: slug.to_string(),
        })?;

    let floor = decode_field(entry.floor_price.as_deref(), "floorPrice", slug)?;
    let top_bid = decode_field(entry.top_bid.as_deref(), "topBid", slug)?;

    Ok(PriceQuote::new(floor, top_bid))
}

fn decode_field(value: Option<&str>, field: &str, slug: &str) -> Result<f64> {
    let raw = value.ok_or_else(|| {
        MarketplaceError::Malformed(format!("collection '{}' has no {}", slug, field))
    })?;
    parse_bigint(raw)
}

#[async_trait]
impl Marketplace for DripClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn get_quote(&self, slug: &str) -> Result<Option<PriceQuote>> {
        self.get_collection_stats(slug).await.map(Some)
    }
}

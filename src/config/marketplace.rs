//! Marketplace endpoint configuration.

/// Settings for a single marketplace API.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceConfig {
    /// API root without a trailing slash.
    pub base_url: String,
    /// Bearer token sent as `Authorization` when present.
    pub api_key: Option<String>,
    /// Wallet whose listings are read (listings marketplace only).
    pub wallet_address: Option<String>,
}

impl MarketplaceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            wallet_address: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_wallet_address(mut self, wallet_address: Option<String>) -> Self {
        self.wallet_address = wallet_address;
        self
    }
}

//! Configuration loading and validation for the price sync bot.
//!
//! All settings come from environment variables, optionally seeded from a
//! `.env` file through dotenvy. Values are read through a lookup function
//! so the same parsing path serves the process environment and tests.

mod duration;
mod error;
mod http;
mod marketplace;

pub use error::ConfigError;
pub use http::HttpConfig;
pub use marketplace::MarketplaceConfig;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::Strategy;

pub const ENV_COLLECTION_SLUGS: &str = "COLLECTION_SLUGS";
pub const ENV_INTERVAL: &str = "INTERVAL_SEC";
pub const ENV_MARGIN_PCT: &str = "MARGIN_PCT";
pub const ENV_STRATEGY: &str = "STRATEGY";
pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_DRIP_BASE_URL: &str = "DRIP_BASE_URL";
pub const ENV_DRIP_API_KEY: &str = "DRIP_API_KEY";
pub const ENV_LL_BASE_URL: &str = "LL_BASE_URL";
pub const ENV_LL_API_KEY: &str = "LL_API_KEY";
pub const ENV_LL_WALLET_ADDRESS: &str = "LL_WALLET_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";
pub const ENV_HTTP_RETRIES: &str = "HTTP_RETRIES";
pub const ENV_HTTP_BACKOFF: &str = "HTTP_BACKOFF";

const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_MARGIN_PCT: f64 = 0.02;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration for the bot. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Collection slugs to sync, in order.
    pub collections: Vec<String>,
    /// Time between the starts of two poll cycles.
    pub interval: Duration,
    /// Fraction applied by the pricing strategy (0.02 = 2%).
    pub margin_pct: f64,
    /// Pricing strategy.
    pub strategy: Strategy,
    /// Log computed actions instead of executing them.
    pub dry_run: bool,
    /// Reference marketplace (Drip.Trade).
    pub drip: MarketplaceConfig,
    /// Listings marketplace (LiquidLoot).
    pub liquidloot: MarketplaceConfig,
    /// Timeout and retry settings shared by both clients.
    pub http: HttpConfig,
    /// Logging verbosity: "debug", "info", "warn", "error".
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// When `env_file` is given it must exist and is loaded first; otherwise
    /// a `.env` in the working directory is loaded if present. Variables
    /// already set in the environment take precedence over file entries.
    pub fn load(env_file: Option<&str>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let collections = parse_collections(get(ENV_COLLECTION_SLUGS).as_deref());
        if collections.is_empty() {
            return Err(ConfigError::Missing(format!(
                "{} (comma-separated list of collection slugs)",
                ENV_COLLECTION_SLUGS
            )));
        }

        let interval = match get(ENV_INTERVAL) {
            Some(raw) => duration::parse_duration(&raw)
                .map_err(|e| ConfigError::invalid(ENV_INTERVAL, &raw, e))?,
            None => DEFAULT_INTERVAL,
        };
        let margin_pct = parse_or(ENV_MARGIN_PCT, get(ENV_MARGIN_PCT), DEFAULT_MARGIN_PCT)?;
        let strategy = parse_or(ENV_STRATEGY, get(ENV_STRATEGY), Strategy::default())?;
        let dry_run = get(ENV_DRY_RUN).map(|v| parse_bool(&v)).unwrap_or(true);

        let drip_base_url = get(ENV_DRIP_BASE_URL);
        let ll_base_url = get(ENV_LL_BASE_URL);
        let (Some(drip_base_url), Some(ll_base_url)) = (drip_base_url, ll_base_url) else {
            return Err(ConfigError::Missing(format!(
                "{} and {}",
                ENV_DRIP_BASE_URL, ENV_LL_BASE_URL
            )));
        };

        let drip = MarketplaceConfig::new(drip_base_url).with_api_key(get(ENV_DRIP_API_KEY));
        let liquidloot = MarketplaceConfig::new(ll_base_url)
            .with_api_key(get(ENV_LL_API_KEY))
            .with_wallet_address(get(ENV_LL_WALLET_ADDRESS));

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout: match get(ENV_HTTP_TIMEOUT) {
                Some(raw) => duration::parse_duration(&raw)
                    .map_err(|e| ConfigError::invalid(ENV_HTTP_TIMEOUT, &raw, e))?,
                None => defaults.timeout,
            },
            max_attempts: parse_or(ENV_HTTP_RETRIES, get(ENV_HTTP_RETRIES), defaults.max_attempts)?,
            backoff_base: parse_or(ENV_HTTP_BACKOFF, get(ENV_HTTP_BACKOFF), defaults.backoff_base)?,
        };

        let log_level = get(ENV_LOG_LEVEL)
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let config = Config {
            collections,
            interval,
            margin_pct,
            strategy,
            dry_run,
            drip,
            liquidloot,
            http,
            log_level,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than zero",
                ENV_INTERVAL
            )));
        }

        if !(0.0..1.0).contains(&self.margin_pct) {
            return Err(ConfigError::Validation(format!(
                "{} must be in [0, 1), got {}",
                ENV_MARGIN_PCT, self.margin_pct
            )));
        }

        if self.http.timeout.is_zero() {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than zero",
                ENV_HTTP_TIMEOUT
            )));
        }

        if self.http.max_attempts == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be at least 1",
                ENV_HTTP_RETRIES
            )));
        }

        if !self.http.backoff_base.is_finite() || self.http.backoff_base <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a positive number",
                ENV_HTTP_BACKOFF
            )));
        }

        for (key, url) in [
            (ENV_DRIP_BASE_URL, &self.drip.base_url),
            (ENV_LL_BASE_URL, &self.liquidloot.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(key, url, "expected an http(s) URL"));
            }
        }

        Ok(())
    }
}

/// Splits a comma-separated slug list, dropping blanks.
fn parse_collections(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts "1", "true" and "yes" (any case) as true; anything else is false.
fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes")
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &raw, e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests;

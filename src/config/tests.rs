//! Tests for config module.

use super::*;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_bare_seconds() {
    let d = duration::parse_duration("30").unwrap();
    assert_eq!(d, Duration::from_secs(30));
}

#[test]
fn test_parse_duration_seconds() {
    let d = duration::parse_duration("45s").unwrap();
    assert_eq!(d, Duration::from_secs(45));
}

#[test]
fn test_parse_duration_minutes() {
    let d = duration::parse_duration("5m").unwrap();
    assert_eq!(d, Duration::from_secs(300));
}

#[test]
fn test_parse_duration_milliseconds() {
    let d = duration::parse_duration("250ms").unwrap();
    assert_eq!(d, Duration::from_millis(250));
}

#[test]
fn test_parse_duration_invalid_unit() {
    let result = duration::parse_duration("10x");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown duration unit"));
}

#[test]
fn test_parse_duration_negative_rejected() {
    assert!(duration::parse_duration("-5").is_err());
}

#[test]
fn test_parse_duration_overflow_rejected() {
    let result = duration::parse_duration("99999999999999999999999");
    assert!(result.unwrap_err().contains("duration out of range"));
}

// ==================== Lookup loading tests ====================

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn minimal_vars() -> HashMap<String, String> {
    vars(&[
        ("COLLECTION_SLUGS", "hypio,pip-frens"),
        ("DRIP_BASE_URL", "https://api.drip.trade/"),
        ("LL_BASE_URL", "https://api.liquidloot.xyz"),
    ])
}

fn from_map(map: &HashMap<String, String>) -> Result<Config, ConfigError> {
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_load_defaults() {
    let cfg = from_map(&minimal_vars()).unwrap();

    assert_eq!(cfg.collections, vec!["hypio", "pip-frens"]);
    assert_eq!(cfg.interval, Duration::from_secs(30));
    assert_eq!(cfg.margin_pct, 0.02);
    assert_eq!(cfg.strategy, Strategy::UndercutFloor);
    assert!(cfg.dry_run);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.http, HttpConfig::default());
    assert_eq!(cfg.drip.api_key, None);
    assert_eq!(cfg.liquidloot.wallet_address, None);
}

#[test]
fn test_base_url_trailing_slash_stripped() {
    let cfg = from_map(&minimal_vars()).unwrap();
    assert_eq!(cfg.drip.base_url, "https://api.drip.trade");
    assert_eq!(cfg.liquidloot.base_url, "https://api.liquidloot.xyz");
}

#[test]
fn test_load_all_fields() {
    let mut map = minimal_vars();
    map.extend(vars(&[
        ("INTERVAL_SEC", "45"),
        ("MARGIN_PCT", "0.05"),
        ("STRATEGY", "above_top_bid"),
        ("DRY_RUN", "no"),
        ("DRIP_API_KEY", "drip-key"),
        ("LL_API_KEY", "ll-key"),
        ("LL_WALLET_ADDRESS", "0xabc"),
        ("LOG_LEVEL", "DEBUG"),
        ("HTTP_TIMEOUT", "5s"),
        ("HTTP_RETRIES", "5"),
        ("HTTP_BACKOFF", "2"),
    ]));

    let cfg = from_map(&map).unwrap();

    assert_eq!(cfg.interval, Duration::from_secs(45));
    assert_eq!(cfg.margin_pct, 0.05);
    assert_eq!(cfg.strategy, Strategy::AboveTopBid);
    assert!(!cfg.dry_run);
    assert_eq!(cfg.drip.api_key.as_deref(), Some("drip-key"));
    assert_eq!(cfg.liquidloot.api_key.as_deref(), Some("ll-key"));
    assert_eq!(cfg.liquidloot.wallet_address.as_deref(), Some("0xabc"));
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.http.timeout, Duration::from_secs(5));
    assert_eq!(cfg.http.max_attempts, 5);
    assert_eq!(cfg.http.backoff_base, 2.0);
}

#[test]
fn test_collections_blank_entries_dropped() {
    let mut map = minimal_vars();
    map.insert("COLLECTION_SLUGS".into(), " a , ,b,, c ".into());

    let cfg = from_map(&map).unwrap();
    assert_eq!(cfg.collections, vec!["a", "b", "c"]);
}

#[test]
fn test_dry_run_truthy_values() {
    for value in ["1", "true", "TRUE", "yes", "Yes"] {
        let mut map = minimal_vars();
        map.insert("DRY_RUN".into(), value.into());
        assert!(from_map(&map).unwrap().dry_run, "{} should be true", value);
    }

    for value in ["0", "false", "off", "nope"] {
        let mut map = minimal_vars();
        map.insert("DRY_RUN".into(), value.into());
        assert!(!from_map(&map).unwrap().dry_run, "{} should be false", value);
    }
}

#[test]
fn test_empty_optional_values_ignored() {
    let mut map = minimal_vars();
    map.insert("DRIP_API_KEY".into(), "   ".into());
    map.insert("LL_WALLET_ADDRESS".into(), "".into());

    let cfg = from_map(&map).unwrap();
    assert_eq!(cfg.drip.api_key, None);
    assert_eq!(cfg.liquidloot.wallet_address, None);
}

// ==================== Validation tests ====================

#[test]
fn test_missing_collections() {
    let mut map = minimal_vars();
    map.remove("COLLECTION_SLUGS");

    let err = from_map(&map).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
    assert!(err.to_string().contains("COLLECTION_SLUGS"));
}

#[test]
fn test_only_commas_counts_as_missing() {
    let mut map = minimal_vars();
    map.insert("COLLECTION_SLUGS".into(), " , ,".into());

    assert!(matches!(from_map(&map), Err(ConfigError::Missing(_))));
}

#[test]
fn test_missing_drip_base_url() {
    let mut map = minimal_vars();
    map.remove("DRIP_BASE_URL");

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("DRIP_BASE_URL"));
}

#[test]
fn test_missing_ll_base_url() {
    let mut map = minimal_vars();
    map.remove("LL_BASE_URL");

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("LL_BASE_URL"));
}

#[test]
fn test_invalid_interval() {
    let mut map = minimal_vars();
    map.insert("INTERVAL_SEC".into(), "soon".into());

    let err = from_map(&map).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "INTERVAL_SEC"));
}

#[test]
fn test_interval_out_of_range() {
    let mut map = minimal_vars();
    map.insert("INTERVAL_SEC".into(), "99999999999999999999999".into());

    let err = from_map(&map).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "INTERVAL_SEC"));
}

#[test]
fn test_http_timeout_out_of_range() {
    let mut map = minimal_vars();
    map.insert("HTTP_TIMEOUT".into(), "99999999999999999999999h".into());

    let err = from_map(&map).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "HTTP_TIMEOUT"));
}

#[test]
fn test_zero_interval_rejected() {
    let mut map = minimal_vars();
    map.insert("INTERVAL_SEC".into(), "0".into());

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("INTERVAL_SEC must be greater than zero"));
}

#[test]
fn test_invalid_margin() {
    let mut map = minimal_vars();
    map.insert("MARGIN_PCT".into(), "two percent".into());

    assert!(matches!(from_map(&map), Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_margin_out_of_range() {
    for value in ["-0.1", "1", "1.5"] {
        let mut map = minimal_vars();
        map.insert("MARGIN_PCT".into(), value.into());

        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("MARGIN_PCT must be in [0, 1)"));
    }
}

#[test]
fn test_unknown_strategy() {
    let mut map = minimal_vars();
    map.insert("STRATEGY".into(), "moon".into());

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("unknown strategy"));
}

#[test]
fn test_zero_retries_rejected() {
    let mut map = minimal_vars();
    map.insert("HTTP_RETRIES".into(), "0".into());

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("HTTP_RETRIES must be at least 1"));
}

#[test]
fn test_non_positive_backoff_rejected() {
    let mut map = minimal_vars();
    map.insert("HTTP_BACKOFF".into(), "0".into());

    let err = from_map(&map).unwrap_err();
    assert!(err.to_string().contains("HTTP_BACKOFF must be a positive number"));
}

#[test]
fn test_non_http_base_url_rejected() {
    let mut map = minimal_vars();
    map.insert("LL_BASE_URL".into(), "ftp://liquidloot".into());

    let err = from_map(&map).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "LL_BASE_URL"));
}

// ==================== Retry settings tests ====================

#[test]
fn test_backoff_delay_is_exponential() {
    let http = HttpConfig::default();
    assert_eq!(http.backoff_delay(1), Duration::from_secs_f64(1.5));
    assert_eq!(http.backoff_delay(2), Duration::from_secs_f64(2.25));
}

#[test]
fn test_backoff_delay_saturates() {
    let http = HttpConfig {
        backoff_base: 10.0,
        ..HttpConfig::default()
    };
    assert_eq!(http.backoff_delay(400), Duration::MAX);
}

// ==================== File loading tests ====================

#[test]
fn test_load_from_env_file() {
    let contents = "\
COLLECTION_SLUGS=from-file
DRIP_BASE_URL=http://127.0.0.1:9001
LL_BASE_URL=http://127.0.0.1:9002
STRATEGY=above_top_bid
";

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();

    let cfg = Config::load(file.path().to_str()).unwrap();

    assert_eq!(cfg.collections, vec!["from-file"]);
    assert_eq!(cfg.drip.base_url, "http://127.0.0.1:9001");
    assert_eq!(cfg.strategy, Strategy::AboveTopBid);
}

#[test]
fn test_load_env_file_not_found() {
    let result = Config::load(Some("nonexistent.env"));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("failed to read env file"));
}

//! Decoding helpers for on-chain fixed-point amounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::{MarketplaceError, Result};

/// Token address marking the chain's native currency in consideration items.
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Decimals of the native currency's smallest unit.
const NATIVE_DECIMALS: u32 = 18;

/// Suffix Drip.Trade appends to serialized big integers.
const BIGINT_MARKER: &str = "$bigint";

/// Converts a base-10 integer amount with 18 decimals to native units.
///
/// Amounts that fit rust_decimal's 96-bit mantissa are scaled exactly;
/// larger ones fall back to float division.
pub fn wei_to_native(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    let wei: u128 = raw
        .parse()
        .map_err(|_| MarketplaceError::Malformed(format!("invalid integer amount: {:?}", raw)))?;

    let exact = i128::try_from(wei)
        .ok()
        .and_then(|w| Decimal::try_from_i128_with_scale(w, NATIVE_DECIMALS).ok())
        .and_then(|d| d.to_f64());

    Ok(exact.unwrap_or_else(|| wei as f64 / 10f64.powi(NATIVE_DECIMALS as i32)))
}

/// Parses a `<integer>$bigint` string into native units.
pub fn parse_bigint(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    wei_to_native(raw.strip_suffix(BIGINT_MARKER).unwrap_or(raw))
}

/// Checks whether a token address denotes the native currency.
pub fn is_native_token(address: &str) -> bool {
    address.trim().eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS)
}

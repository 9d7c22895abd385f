//! Conversion between whole-token quantities and base units.
//!
//! Every amount held by the ledger is a plain `u128` of base units. Anything
//! entered by a person (deployment parameters, admin settings, CLI flags) is
//! expressed in whole tokens and crosses into base units here and nowhere else.

use crate::error::{CommonError, Result};
use crate::types::Amount;

/// Number of decimal places of the base unit.
pub const DECIMALS: u8 = 18;

/// Base units per whole token.
pub const SCALE: Amount = 1_000_000_000_000_000_000;

/// Scale a whole-token quantity into base units.
pub fn to_base_units(whole: Amount) -> Result<Amount> {
    whole
        .checked_mul(SCALE)
        .ok_or(CommonError::UnitsOverflow(whole))
}

/// Parse a decimal token string such as `"12.5"` into base units.
pub fn parse_units(input: &str) -> Result<Amount> {
    let s = input.trim();
    let invalid = || CommonError::InvalidAmount(input.to_string());

    let (whole, fraction) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > DECIMALS as usize {
        return Err(invalid());
    }

    let whole: Amount = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut base = to_base_units(whole)?;

    if !fraction.is_empty() {
        let digits: Amount = fraction.parse().map_err(|_| invalid())?;
        let padding = 10u128.pow(DECIMALS as u32 - fraction.len() as u32);
        base = base
            .checked_add(digits * padding)
            .ok_or(CommonError::UnitsOverflow(whole))?;
    }
    Ok(base)
}

/// Render base units as a decimal token string, e.g. `"9950.0"` or `"0.5"`.
pub fn format_units(amount: Amount) -> String {
    let whole = amount / SCALE;
    let fraction = amount % SCALE;
    if fraction == 0 {
        return format!("{}.0", whole);
    }
    let digits = format!("{:0width$}", fraction, width = DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

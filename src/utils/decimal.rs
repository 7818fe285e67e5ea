//! Smallest-unit <-> human-unit conversion.
//!
//! Amounts and fees travel through the inspector as plain decimal strings
//! (`"1.5"`, never `"1.5e0"`), produced from integer smallest-unit values by
//! shifting the decimal point `decimals` places to the left.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::error::AppError;

/// Shift an integer smallest-unit value into human units.
pub fn shift_to_units(value: &BigInt, decimals: u32) -> BigDecimal {
    BigDecimal::new(value.clone(), i64::from(decimals))
}

/// Render a decimal in plain notation with trailing fractional zeros removed.
pub fn format_amount(value: &BigDecimal) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    if digits.is_zero() {
        return "0".to_string();
    }

    let mut plain = digits.abs().to_string();
    let formatted = if scale <= 0 {
        plain.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        plain
    } else {
        let scale = scale as usize;
        if plain.len() <= scale {
            plain = format!("{}{}", "0".repeat(scale + 1 - plain.len()), plain);
        }
        let (int_part, frac_part) = plain.split_at(plain.len() - scale);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    };

    if digits.is_negative() {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Shorthand for `format_amount(&shift_to_units(value, decimals))`.
pub fn to_units(value: &BigInt, decimals: u32) -> String {
    format_amount(&shift_to_units(value, decimals))
}

/// Reverse of [`to_units`]: shift a human-unit amount back into an integer.
///
/// Fails when the amount has more fractional digits than `decimals`, since
/// the result would not be an integer.
pub fn to_smallest_unit(amount: &str, decimals: u32) -> Result<BigInt, AppError> {
    let value = BigDecimal::from_str(amount)
        .map_err(|e| AppError::ParseError(format!("Invalid amount {}: {}", amount, e)))?;
    let (digits, scale) = value.into_bigint_and_exponent();
    let shift = i64::from(decimals) - scale;

    if shift >= 0 {
        return Ok(digits * pow10(shift as u64));
    }

    let divisor = pow10(shift.unsigned_abs());
    if !(&digits % &divisor).is_zero() {
        return Err(AppError::ParseError(format!(
            "Amount {} has more than {} fractional digits",
            amount, decimals
        )));
    }
    Ok(digits / divisor)
}

fn pow10(exp: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Parse a `0x`-prefixed (or bare) hex quantity into an integer.
pub fn parse_hex_quantity(hex: &str) -> Result<BigInt, AppError> {
    let digits = hex.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(BigInt::zero());
    }
    BigInt::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| AppError::ParseError(format!("Invalid hex quantity: {}", hex)))
}

/// Parse a hex quantity that must fit a block number.
pub fn parse_hex_u64(hex: &str) -> Result<u64, AppError> {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16)
        .map_err(|e| AppError::ParseError(format!("Invalid hex number {}: {}", hex, e)))
}

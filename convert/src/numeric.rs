//! Numeric literal parsing.
//!
//! Integer literals follow the engine's compatibility rules exactly:
//!
//! - leading/trailing ASCII whitespace is trimmed;
//! - an optional single leading `-` is accepted for signed widths;
//! - a lowercase `0x` prefix selects hexadecimal (unsigned magnitude only,
//!   so `-0x10` is rejected; `0X` is not recognized and fails as a plain
//!   decimal literal);
//! - a lowercase `0n` prefix forces decimal interpretation of the digits
//!   that follow, escaping leading-zero ambiguity (`0N` fails likewise);
//! - a bare leading zero stays decimal, never octal;
//! - overflow of the target width is an error, not truncation.
//!
//! Formatting always emits plain decimal, so hex input round-trips through
//! the value, not the original spelling.

use argline_core::IntWidth;

use crate::error::{ConvertError, Result};

/// Parses a signed integer literal into a width-checked value.
pub fn parse_int(width: IntWidth, shape_name: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim_ascii();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let magnitude = parse_magnitude(shape_name, text, rest, negative)?;

    let value = if negative {
        -(i128::from(magnitude))
    } else {
        i128::from(magnitude)
    };
    let (min, max) = width.signed_range();
    if value < i128::from(min) || value > i128::from(max) {
        return Err(ConvertError::invalid(
            shape_name,
            text,
            "value out of range",
        ));
    }
    Ok(value as i64)
}

/// Parses an unsigned integer literal into a width-checked value.
pub fn parse_uint(width: IntWidth, shape_name: &str, text: &str) -> Result<u64> {
    let trimmed = text.trim_ascii();
    let magnitude = parse_magnitude(shape_name, text, trimmed, false)?;
    if magnitude > width.unsigned_max() {
        return Err(ConvertError::invalid(
            shape_name,
            text,
            "value out of range",
        ));
    }
    Ok(magnitude)
}

/// Parses the unsigned magnitude, honoring the `0x` and `0n` prefixes.
fn parse_magnitude(shape_name: &str, original: &str, body: &str, negative: bool) -> Result<u64> {
    if body.is_empty() {
        return Err(ConvertError::invalid(shape_name, original, "empty literal"));
    }
    // Prefixes are lowercase-only; `0X16` falls through to the decimal path
    // and fails on the 'X'.
    if let Some(digits) = body.strip_prefix("0x") {
        if negative {
            return Err(ConvertError::invalid(
                shape_name,
                original,
                "hex literals cannot be negative",
            ));
        }
        return parse_digits(shape_name, original, digits, 16);
    }
    if let Some(digits) = body.strip_prefix("0n") {
        return parse_digits(shape_name, original, digits, 10);
    }
    parse_digits(shape_name, original, body, 10)
}

fn parse_digits(shape_name: &str, original: &str, digits: &str, radix: u32) -> Result<u64> {
    if digits.is_empty() {
        return Err(ConvertError::invalid(shape_name, original, "missing digits"));
    }
    let valid = digits.chars().all(|c| c.is_digit(radix));
    if !valid {
        let reason = if radix == 16 {
            "invalid hex digit"
        } else {
            "invalid decimal digit"
        };
        return Err(ConvertError::invalid(shape_name, original, reason));
    }
    u64::from_str_radix(digits, radix)
        .map_err(|_| ConvertError::invalid(shape_name, original, "value out of range"))
}

/// Parses a 32-bit float literal (decimal forms only, whitespace trimmed).
pub fn parse_float32(shape_name: &str, text: &str) -> Result<f32> {
    let trimmed = text.trim_ascii();
    if trimmed.is_empty() {
        return Err(ConvertError::invalid(shape_name, text, "empty literal"));
    }
    trimmed
        .parse::<f32>()
        .map_err(|_| ConvertError::invalid(shape_name, text, "not a valid float"))
}

/// Parses a 64-bit float literal (decimal forms only, whitespace trimmed).
pub fn parse_float64(shape_name: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim_ascii();
    if trimmed.is_empty() {
        return Err(ConvertError::invalid(shape_name, text, "empty literal"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ConvertError::invalid(shape_name, text, "not a valid float"))
}

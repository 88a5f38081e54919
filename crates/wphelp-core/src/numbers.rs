//! Number parsing and formatting helpers.
//!
//! - [`parse_size`]: `php.ini`-style size strings (`"2M"`) to a byte count
//! - [`human_number`]: compact display form (`1500` → `"1.5K"`)
//! - [`number_format`]: fixed two decimals, the format payment gateways expect

use crate::error::{HelperError, Result};
use std::fmt;

/// Size-unit suffixes in ascending order; each level multiplies by 1024.
const SIZE_UNITS: [char; 5] = ['K', 'M', 'G', 'T', 'P'];

/// Display suffixes for [`human_number`], one per power of 1000.
const HUMAN_UNITS: [&str; 6] = ["", "K", "M", "B", "T", "Q"];

/// Convert a size string such as `"2M"` or `"512k"` to a byte count.
///
/// A trailing K, M, G, T or P (any case) multiplies the numeric prefix by
/// 1024 once per level. Without a suffix, or with any other trailing letter,
/// the numeric prefix is returned unscaled. Fractional prefixes are scaled
/// and then truncated toward zero. A prefix that is not a number is an
/// [`HelperError::InvalidSize`].
///
/// ```
/// use wphelp_core::numbers::parse_size;
/// assert_eq!(parse_size("2M").unwrap(), 2_097_152);
/// assert_eq!(parse_size("10").unwrap(), 10);
/// assert_eq!(parse_size("10X").unwrap(), 10);
/// assert!(parse_size("ten").is_err());
/// ```
pub fn parse_size(size: &str) -> Result<i64> {
    let trimmed = size.trim();
    let invalid = || HelperError::InvalidSize(size.to_string());

    let last = trimmed.chars().last().ok_or_else(invalid)?;
    let (number, exponent) = if last.is_ascii_alphabetic() {
        let upper = last.to_ascii_uppercase();
        // Unrecognized letters are dropped and leave the prefix unscaled.
        let exponent = SIZE_UNITS
            .iter()
            .position(|&unit| unit == upper)
            .map_or(0, |level| level as i32 + 1);
        (&trimmed[..trimmed.len() - 1], exponent)
    } else {
        (trimmed, 0)
    };

    let number = number.trim();
    if let Ok(n) = number.parse::<i64>() {
        return n
            .checked_mul(1024_i64.pow(exponent as u32))
            .ok_or_else(invalid);
    }
    let n: f64 = number.parse().map_err(|_| invalid())?;
    let bytes = n * 1024_f64.powi(exponent);
    if !bytes.is_finite() || bytes.abs() >= i64::MAX as f64 {
        return Err(invalid());
    }
    Ok(bytes.trunc() as i64)
}

/// Result of [`human_number`]: small values stay numeric, large ones become
/// a suffixed string.
#[derive(Debug, Clone, PartialEq)]
pub enum HumanNumber {
    Number(f64),
    Text(String),
}

impl fmt::Display for HumanNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumanNumber::Number(n) => write!(f, "{}", crate::types::format_float(*n)),
            HumanNumber::Text(s) => f.write_str(s),
        }
    }
}

/// Abbreviate a number with K, M, B, T or Q at powers of 1000.
///
/// One decimal place is kept and a trailing `.0` dropped. Values with a
/// magnitude below 1000, or beyond the Q range, are returned unchanged as
/// [`HumanNumber::Number`]. NaN and infinities yield `Number(0.0)`.
///
/// ```
/// use wphelp_core::numbers::{human_number, HumanNumber};
/// assert_eq!(human_number(1500.0), HumanNumber::Text("1.5K".into()));
/// assert_eq!(human_number(-2_000_000.0), HumanNumber::Text("-2M".into()));
/// assert_eq!(human_number(500.0), HumanNumber::Number(500.0));
/// ```
pub fn human_number(number: f64) -> HumanNumber {
    if !number.is_finite() {
        return HumanNumber::Number(0.0);
    }
    let magnitude = number.abs();
    if magnitude < 1000.0 {
        return HumanNumber::Number(number);
    }

    let mut unit = 0;
    while unit + 1 < HUMAN_UNITS.len() && magnitude >= 1000_f64.powi(unit as i32 + 1) {
        unit += 1;
    }
    if magnitude >= 1000_f64.powi(HUMAN_UNITS.len() as i32) {
        return HumanNumber::Number(number);
    }

    let mut scaled = format!("{:.1}", magnitude / 1000_f64.powi(unit as i32));
    // 999.95K rounds up to "1000.0"; carry into the next unit.
    if unit + 1 < HUMAN_UNITS.len() && scaled.parse::<f64>().is_ok_and(|v| v >= 1000.0) {
        unit += 1;
        scaled = format!("{:.1}", magnitude / 1000_f64.powi(unit as i32));
    }
    let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled);
    let sign = if number < 0.0 { "-" } else { "" };
    HumanNumber::Text(format!("{}{}{}", sign, scaled, HUMAN_UNITS[unit]))
}

/// Format with exactly two decimals, `.` as the separator and no grouping.
///
/// ```
/// use wphelp_core::numbers::number_format;
/// assert_eq!(number_format(1234.5), "1234.50");
/// ```
pub fn number_format(number: f64) -> String {
    format!("{:.2}", number)
}

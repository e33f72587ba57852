//! Common helpers shared by the calculators and form rules.
//!
//! Rounding, rupiah display formatting, and parsing of amounts typed into
//! numeric form fields.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Error returned when a non-empty field does not hold a number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount '{input}'")]
pub struct ParseAmountError {
    pub input: String,
}

/// Rounds a decimal value to the nearest whole currency unit, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use umkm_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(4563290.6177)), dec!(4563291));
/// assert_eq!(round_whole(dec!(10.5)), dec!(11));
/// assert_eq!(round_whole(dec!(10.49)), dec!(10));
/// assert_eq!(round_whole(dec!(-10.5)), dec!(-11));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as rupiah with `.` as the thousands separator.
///
/// The amount is rounded to whole rupiah first; this is display only.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use umkm_core::calculations::common::format_rupiah;
///
/// assert_eq!(format_rupiah(dec!(4563290.62)), "Rp 4.563.291");
/// assert_eq!(format_rupiah(dec!(950)), "Rp 950");
/// assert_eq!(format_rupiah(dec!(-7500000)), "Rp -7.500.000");
/// ```
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = round_whole(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Strips every character that is not an ASCII digit.
///
/// Numeric inputs apply this on each keystroke, so `"Rp 12.000"` becomes `"12000"`.
pub fn digits_only(input: &str) -> String {
    NON_DIGIT.replace_all(input, "").into_owned()
}

/// Parses the text of a numeric field.
///
/// Empty or whitespace-only input means "not provided" and returns `None`,
/// which is distinct from an explicit zero.
///
/// # Errors
///
/// Returns [`ParseAmountError`] when the text is non-empty but not a number.
pub fn parse_amount(input: &str) -> Result<Option<Decimal>, ParseAmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .map(Some)
        .map_err(|_| ParseAmountError {
            input: input.to_string(),
        })
}

/// Parses a numeric field, treating blank or invalid text as zero.
///
/// Used for live previews (such as the profit figure) where a half-typed
/// value should not block the display.
pub fn amount_or_zero(input: &str) -> Decimal {
    parse_amount(input).ok().flatten().unwrap_or(Decimal::ZERO)
}

//! pt-BR decimal normalization.
//!
//! Source documents mix two renderings of the same number: raw schema
//! values with a period decimal separator (`10.50`) and display values in
//! Brazilian locale with period grouping and a comma decimal separator
//! (`1.234,56`). Records carry the display form; aggregation and export
//! parse it back.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses either rendering into a [`Decimal`].
///
/// When a comma is present, periods are digit grouping and the comma is the
/// decimal separator; otherwise the period is the decimal separator.
/// Returns `None` for empty or unparseable input.
pub fn try_parse_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// Lossy-safe parse: [`Decimal::ZERO`] for empty or unparseable input.
/// Never errors — tax fields degrade to zero rather than poison a batch.
pub fn parse_amount(value: &str) -> Decimal {
    try_parse_amount(value).unwrap_or(Decimal::ZERO)
}

/// Renders a decimal in pt-BR display form: two decimal places, comma
/// decimal separator, period digit grouping (`1.234,56`).
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    let digits = int_part.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*digit as char);
    }
    out.push(',');
    out.push_str(frac_part);
    out
}

/// Re-renders a raw value string in display form; empty string when the
/// input does not parse.
pub fn reformat(value: &str) -> String {
    match try_parse_amount(value) {
        Some(parsed) => format_amount(parsed),
        None => String::new(),
    }
}

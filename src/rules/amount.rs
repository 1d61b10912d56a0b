// ABOUTME: Tolerant parsing of monetary totals from order documents
// ABOUTME: Accepts plain numbers or formatted strings with separators and a currency symbol

use crate::order::Amount;

/// Parse a formatted amount such as "$12,345.67" or "12 500.00". Returns None
/// when no numeric value can be recovered.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Strip a leading currency symbol (any run of non-numeric characters),
    // then drop thousands separators.
    let stripped = trimmed.trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'));
    let cleaned: String = stripped
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '_'))
        .collect();

    cleaned.parse::<f64>().ok()
}

/// Numeric value of a document total, whichever representation it arrived in.
pub fn amount_value(total: &Amount) -> Option<f64> {
    match total {
        Amount::Number(value) => Some(*value),
        Amount::Text(text) => parse_amount(text),
    }
}

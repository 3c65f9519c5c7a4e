//! Lenient numeric parsing and currency rounding
//!
//! Entered text never fails to parse: malformed amounts read as zero and
//! malformed band entries read as blank slots.

/// Round to currency precision (2 dp, half away from zero).
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse an entered amount. Blank or malformed text yields `0.0`.
///
/// Thousands separators are accepted: `"6,500"` parses as `6500.0`.
pub fn parse_amount(text: &str) -> f64 {
    parse_entry(text).unwrap_or(0.0)
}

/// Parse a band entry. Blank or malformed text yields `None` (a blank slot).
pub fn parse_entry(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

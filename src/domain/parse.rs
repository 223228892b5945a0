// src/domain/parse.rs

/// Symbols stripped from raw price strings before parsing.
const CURRENCY_SYMBOLS: [char; 4] = ['₦', '$', '£', '€'];

/// Parses a raw price like `"₦1,200,000 / month"` into a number.
///
/// Currency symbols and thousands separators are removed, anything after the
/// first `/` (a per-period marker) is dropped, and the rest is trimmed.
/// Returns `None` when what is left is not a finite number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    let amount = cleaned.split('/').next().unwrap_or("").trim();

    amount.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Splits `"<area>, <city>"` into `(area, city)`.
/// Without a comma both halves are the whole trimmed string.
pub fn split_location(raw: &str) -> (&str, &str) {
    let mut parts = raw.split(',');
    let first = parts.next().unwrap_or("").trim();

    match parts.last() {
        Some(last) => (first, last.trim()),
        None => (first, first),
    }
}

pub fn property_type(status: &[String]) -> &str {
    status.first().map(String::as_str).unwrap_or("")
}

pub fn listing_type(status: &[String]) -> &str {
    status.get(1).map(String::as_str).unwrap_or("")
}

/// Case-insensitive substring test.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn eq_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

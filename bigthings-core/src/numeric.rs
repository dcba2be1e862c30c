//! Lenient parsing for numbers the catalog transports as text.
//!
//! The catalog encodes ratings and coordinates as JSON strings. Absent,
//! blank, or malformed values resolve to `0.0` rather than an error.

use serde::{Deserialize, Deserializer};

/// Parse a textual number, falling back to `0.0`.
///
/// Surrounding whitespace is ignored. Values that do not parse, or parse to a
/// non-finite number, yield `0.0`.
///
/// # Examples
/// ```
/// use bigthings_core::parse_numeric;
///
/// assert_eq!(parse_numeric("4.5"), 4.5);
/// assert_eq!(parse_numeric(" 3 "), 3.0);
/// assert_eq!(parse_numeric("n/a"), 0.0);
/// assert_eq!(parse_numeric(""), 0.0);
/// ```
#[must_use]
pub fn parse_numeric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Wire representation accepted for numeric text fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
    Null(()),
}

/// Deserialise a string field that some payloads send as a bare number.
///
/// Numbers are kept in their textual form and `null` becomes an empty string,
/// so the record stays decodable and [`parse_numeric`] applies later.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}

//! Lenient number parsing.
//!
//! The data-fetch collaborator is loose about numbers: JSON numbers, quoted
//! numbers, scientific notation, and European-formatted text (`1.234,5`) all
//! appear. Parsing never fails here; it classifies the text and leaves the
//! decision (reject, default to zero) to the validator. A finite number too
//! large for `Decimal` is classified apart from garbage so it can be
//! rejected rather than defaulted.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Outcome of reading one numeric field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Value(Decimal),
    /// NaN or infinite. The original text is kept for error messages.
    NonFinite(String),
    /// Absent, null or blank.
    Missing,
    /// Present but not a number.
    Malformed(String),
    /// A finite number outside `Decimal` range.
    OutOfRange(String),
}

impl Field {
    /// Read a JSON value: numbers and numeric strings are accepted.
    #[must_use]
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            None | Some(serde_json::Value::Null) => Self::Missing,
            Some(serde_json::Value::Number(n)) => parse_plain(&n.to_string()),
            Some(serde_json::Value::String(s)) => parse_plain(s),
            Some(other) => Self::Malformed(other.to_string()),
        }
    }
}

/// Parse `.`-decimal text, with or without exponent.
#[must_use]
pub fn parse_plain(text: &str) -> Field {
    let text = text.trim();
    if text.is_empty() {
        return Field::Missing;
    }
    if let Ok(value) = Decimal::from_str(text) {
        return Field::Value(value);
    }
    if let Ok(value) = Decimal::from_scientific(text) {
        return Field::Value(value);
    }
    match text.parse::<f64>() {
        Ok(f) if !f.is_finite() => Field::NonFinite(text.to_string()),
        Ok(f) => Decimal::from_f64(f).map_or_else(|| Field::OutOfRange(text.to_string()), Field::Value),
        Err(_) => Field::Malformed(text.to_string()),
    }
}

/// Parse European-formatted text: `.` groups thousands, `,` is the decimal
/// separator.
#[must_use]
pub fn parse_european(text: &str) -> Field {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    match parse_plain(&normalized) {
        // Report the text as written.
        Field::NonFinite(_) => Field::NonFinite(text.trim().to_string()),
        Field::Malformed(_) => Field::Malformed(text.trim().to_string()),
        Field::OutOfRange(_) => Field::OutOfRange(text.trim().to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_plain("45.5"), Field::Value(Decimal::new(455, 1)));
        assert_eq!(parse_plain(" -3 "), Field::Value(Decimal::new(-3, 0)));
        assert_eq!(parse_plain("1e3"), Field::Value(Decimal::new(1000, 0)));
        assert_eq!(parse_plain("2.5e-1"), Field::Value(Decimal::new(25, 2)));
    }

    #[test]
    fn blank_is_missing() {
        assert_eq!(parse_plain(""), Field::Missing);
        assert_eq!(parse_plain("   "), Field::Missing);
    }

    #[test]
    fn non_finite_detected() {
        assert!(matches!(parse_plain("NaN"), Field::NonFinite(_)));
        assert!(matches!(parse_plain("inf"), Field::NonFinite(_)));
        assert!(matches!(parse_plain("-Infinity"), Field::NonFinite(_)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(parse_plain("abc"), Field::Malformed("abc".into()));
        assert!(matches!(parse_plain("12,5"), Field::Malformed(_)));
    }

    #[test]
    fn finite_beyond_decimal_is_out_of_range() {
        assert_eq!(parse_plain("1e40"), Field::OutOfRange("1e40".into()));
        assert_eq!(parse_plain("-3.5E31"), Field::OutOfRange("-3.5E31".into()));
        assert_eq!(
            parse_european("100.000.000.000.000.000.000.000.000.000"),
            Field::OutOfRange("100.000.000.000.000.000.000.000.000.000".into())
        );
        assert_eq!(Field::from_json(Some(&json!(1e300))), Field::OutOfRange("1e300".into()));
    }

    #[test]
    fn european_format() {
        assert_eq!(parse_european("1.234,56"), Field::Value(Decimal::new(123_456, 2)));
        assert_eq!(parse_european("0,5"), Field::Value(Decimal::new(5, 1)));
        assert_eq!(parse_european("-12"), Field::Value(Decimal::new(-12, 0)));
        assert_eq!(parse_european(""), Field::Missing);
        assert_eq!(parse_european("n/a"), Field::Malformed("n/a".into()));
    }

    #[test]
    fn json_values() {
        let row = json!({ "a": 12.5, "b": "7", "c": null, "d": true });
        assert_eq!(Field::from_json(row.get("a")), Field::Value(Decimal::new(125, 1)));
        assert_eq!(Field::from_json(row.get("b")), Field::Value(Decimal::new(7, 0)));
        assert_eq!(Field::from_json(row.get("c")), Field::Missing);
        assert_eq!(Field::from_json(row.get("missing")), Field::Missing);
        assert!(matches!(Field::from_json(row.get("d")), Field::Malformed(_)));
    }
}

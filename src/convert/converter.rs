//! Raw text to typed value conversion
//!
//! Conversion never fails: anything no parser accepts comes back as a string.

use super::types::{PrimitiveType, TypedValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::trace;

/// Parser for one primitive type; `None` means the value is not of that type
pub type Parser = fn(&str) -> Option<TypedValue>;

/// Converted value paired with the type it was classified as
///
/// The type is `None` only for absent or empty input.
pub type Conversion = (TypedValue, Option<PrimitiveType>);

/// Free-form inference attempts, highest priority first
///
/// Timestamp is deliberately absent: it is only tried when a caller asks
/// for it. String is the implicit fallback after the list is exhausted.
pub const INFERENCE_ORDER: &[(PrimitiveType, Parser)] = &[
    (PrimitiveType::Integer, parse_integer),
    (PrimitiveType::Number, parse_number),
];

/// Infer the natural type of a raw value and convert it
///
/// ```
/// use solidafy_smart_csv::convert::{convert, PrimitiveType, TypedValue};
///
/// assert_eq!(convert(Some("-42")), (TypedValue::Integer(-42), Some(PrimitiveType::Integer)));
/// assert_eq!(convert(Some("")), (TypedValue::Null, None));
/// ```
pub fn convert(raw: Option<&str>) -> Conversion {
    convert_with(raw, INFERENCE_ORDER)
}

/// Convert a raw value, attempting only `desired`
///
/// Falls back to string when the value does not parse as `desired`.
pub fn convert_as(raw: Option<&str>, desired: PrimitiveType) -> Conversion {
    convert_with(raw, &[(desired, parser_for(desired))])
}

/// Run `attempts` in order against a raw value, falling back to string
pub fn convert_with(raw: Option<&str>, attempts: &[(PrimitiveType, Parser)]) -> Conversion {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return (TypedValue::Null, None);
    };

    for (kind, parser) in attempts {
        if let Some(value) = parser(raw) {
            trace!(value = raw, kind = %kind, "converted");
            return (value, Some(*kind));
        }
        trace!(value = raw, kind = %kind, "conversion attempt rejected");
    }

    (TypedValue::String(raw.to_string()), Some(PrimitiveType::String))
}

/// Parser used when a caller asks for a specific type
pub fn parser_for(kind: PrimitiveType) -> Parser {
    match kind {
        PrimitiveType::Integer => parse_integer,
        PrimitiveType::Number => parse_number,
        PrimitiveType::Timestamp => parse_timestamp,
        PrimitiveType::String => parse_string,
    }
}

/// Optional sign followed by ASCII digits only, within i64 range
pub fn parse_integer(raw: &str) -> Option<TypedValue> {
    let digits = raw
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().map(TypedValue::Integer)
}

/// Float literal (decimals, exponents, inf, NaN)
///
/// Surrounding ASCII whitespace is ignored. Underscores are accepted only
/// as digit group separators, with a digit on each side.
pub fn parse_number(raw: &str) -> Option<TypedValue> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.contains('_') {
        return strip_digit_separators(trimmed)?
            .parse::<f64>()
            .ok()
            .map(TypedValue::Number);
    }
    trimmed.parse::<f64>().ok().map(TypedValue::Number)
}

fn strip_digit_separators(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        let is_digit = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_digit());
        if !(is_digit(before) && is_digit(after)) {
            return None;
        }
    }
    Some(out)
}

/// Permissive date/time parsing; inputs without an offset are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<TypedValue> {
    parse_date_time(raw).map(TypedValue::Timestamp)
}

fn parse_string(raw: &str) -> Option<TypedValue> {
    Some(TypedValue::String(raw.to_string()))
}

// ============================================================================
// Date/time formats
// ============================================================================

/// Formats carrying an explicit offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f %#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y/%m/%d %H:%M:%S%.f%#z",
];

/// Date-time formats without offset
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y%m%dT%H%M%S",
    "%b %d %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

/// Date-only formats, resolved to midnight
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

fn parse_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    if let Some(ndt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(assume_utc(ndt));
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(assume_utc)
}

fn assume_utc(ndt: NaiveDateTime) -> DateTime<FixedOffset> {
    ndt.and_utc().fixed_offset()
}

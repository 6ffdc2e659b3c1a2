//! Common types used throughout Solidafy Smart CSV
//!
//! Record shapes shared by the decoder, the inference core, and the output
//! layer.

use crate::convert::TypedValue;
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A raw field value: absent (`None`), the empty string, or a text token
pub type RawValue = Option<String>;

/// One row as produced by the record source, keyed by field name
pub type RawRecord = BTreeMap<String, RawValue>;

/// One row after coercion against a field schema
pub type TypedRecord = BTreeMap<String, TypedValue>;

// ============================================================================
// Helpers
// ============================================================================

/// Build a [`RawRecord`] where every field is present
///
/// ```
/// use solidafy_smart_csv::raw_record;
///
/// let record = raw_record([("id", "1"), ("name", "")]);
/// assert_eq!(record["name"].as_deref(), Some(""));
/// ```
pub fn raw_record<I, K, V>(pairs: I) -> RawRecord
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Some(v.into())))
        .collect()
}

/// Render a typed record as a JSON object
pub fn typed_record_to_json(record: &TypedRecord) -> JsonObject {
    record
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect()
}

//! Coercion of raw values into an already-declared type

use super::converter::convert_as;
use super::types::{DeclaredTypes, TypedValue};

/// Force a raw value into the declared type
///
/// Absent and empty values are null whatever the declaration says. Values
/// that do not parse as the declared type come back as strings.
pub fn coerce(raw: Option<&str>, declared: &DeclaredTypes) -> TypedValue {
    if raw.map_or(true, str::is_empty) {
        return TypedValue::Null;
    }

    let (value, _) = convert_as(raw, declared.desired_type());
    value
}

//! Conversion types

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Primitive type a raw text value can be converted to
///
/// Variant order is the declaration order used for sorting observed type
/// sets; it is not the widening order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Whole number
    #[serde(rename = "integer")]
    Integer,
    /// Float
    #[serde(rename = "number")]
    Number,
    /// Date-time instant
    #[serde(rename = "date-time")]
    Timestamp,
    /// Text; the fallback for everything
    #[serde(rename = "string")]
    String,
}

impl PrimitiveType {
    /// Every primitive type, in declaration order
    pub const ALL: [PrimitiveType; 4] = [
        PrimitiveType::Integer,
        PrimitiveType::Number,
        PrimitiveType::Timestamp,
        PrimitiveType::String,
    ];

    /// Name used in schemas and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Timestamp => "date-time",
            PrimitiveType::String => "string",
        }
    }

    /// Check whether every value of `self` is acceptably represented by `other`
    ///
    /// integer ⊑ number ⊑ string, timestamp ⊑ string. Timestamp is not
    /// comparable with the numeric types.
    pub fn widens_to(&self, other: &PrimitiveType) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (_, PrimitiveType::String) => true,
            (PrimitiveType::Integer, PrimitiveType::Number) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of converting one raw value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Absent or empty input
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// Double-precision float
    Number(f64),
    /// Instant with an explicit offset (UTC when the input carried none)
    Timestamp(DateTime<FixedOffset>),
    /// Text, unchanged
    String(String),
}

impl TypedValue {
    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// The primitive type this value carries, `None` for null
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            TypedValue::Null => None,
            TypedValue::Integer(_) => Some(PrimitiveType::Integer),
            TypedValue::Number(_) => Some(PrimitiveType::Number),
            TypedValue::Timestamp(_) => Some(PrimitiveType::Timestamp),
            TypedValue::String(_) => Some(PrimitiveType::String),
        }
    }

    /// Get the integer value, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the float value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Timestamp rendered as ISO-8601 with explicit offset
    pub fn to_iso8601(&self) -> Option<String> {
        match self {
            TypedValue::Timestamp(ts) => Some(ts.to_rfc3339()),
            _ => None,
        }
    }

    /// Convert to a JSON value
    ///
    /// Non-finite floats have no JSON representation and become null.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Integer(n) => Value::from(*n),
            TypedValue::Number(n) => {
                serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)
            }
            TypedValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
            TypedValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => Ok(()),
            TypedValue::Integer(n) => write!(f, "{n}"),
            TypedValue::Number(n) => write!(f, "{n}"),
            TypedValue::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            TypedValue::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::Null => serializer.serialize_none(),
            TypedValue::Integer(n) => serializer.serialize_i64(*n),
            TypedValue::Number(n) => serializer.serialize_f64(*n),
            TypedValue::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            TypedValue::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Declared type(s) for a field
///
/// Either one primitive type or an ordered union in which `None` is the null
/// marker, e.g. `[None, Some(Integer)]` for `["null", "integer"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredTypes {
    /// Exactly one type
    Single(PrimitiveType),
    /// Ordered union; `None` marks null
    Union(Vec<Option<PrimitiveType>>),
}

impl DeclaredTypes {
    /// Nullable union of one primitive type
    pub fn nullable(t: PrimitiveType) -> Self {
        DeclaredTypes::Union(vec![None, Some(t)])
    }

    /// The one concrete type coercion should target
    ///
    /// For a union, null markers are discarded and the last remaining entry
    /// wins. A union holding nothing but null markers targets string.
    pub fn desired_type(&self) -> PrimitiveType {
        match self {
            DeclaredTypes::Single(t) => *t,
            DeclaredTypes::Union(types) => types
                .iter()
                .rev()
                .find_map(|t| *t)
                .unwrap_or(PrimitiveType::String),
        }
    }

    /// Check whether the declaration admits null
    pub fn is_nullable(&self) -> bool {
        match self {
            DeclaredTypes::Single(_) => false,
            DeclaredTypes::Union(types) => types.iter().any(Option::is_none),
        }
    }
}

impl From<PrimitiveType> for DeclaredTypes {
    fn from(t: PrimitiveType) -> Self {
        DeclaredTypes::Single(t)
    }
}

//! Schema types

use crate::convert::{DeclaredTypes, PrimitiveType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format annotation carried by timestamp fields
pub const DATE_TIME_FORMAT: &str = "date-time";

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// Text (also timestamps, with a format)
    String,
    /// Float
    Number,
    /// Whole number
    Integer,
    /// Object (stream schemas only)
    Object,
    /// Null marker
    Null,
}

impl JsonType {
    /// JSON type used to declare a primitive type
    ///
    /// Timestamps are strings; the `date-time` format tells them apart.
    pub fn from_primitive(kind: PrimitiveType) -> Self {
        match kind {
            PrimitiveType::Integer => JsonType::Integer,
            PrimitiveType::Number => JsonType::Number,
            PrimitiveType::Timestamp | PrimitiveType::String => JsonType::String,
        }
    }

    /// Primitive type this JSON type declares, `None` for the null marker
    pub fn to_primitive(self, format: Option<&str>) -> Option<PrimitiveType> {
        match self {
            JsonType::Null => None,
            JsonType::Integer => Some(PrimitiveType::Integer),
            JsonType::Number => Some(PrimitiveType::Number),
            JsonType::String if format == Some(DATE_TIME_FORMAT) => {
                Some(PrimitiveType::Timestamp)
            }
            // Objects are never inferred; coerce them as text if declared
            JsonType::String | JsonType::Object => Some(PrimitiveType::String),
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Object => write!(f, "object"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// JSON type can be a single type or array of types (for nullable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonTypeOrArray {
    /// One type
    Single(JsonType),
    /// Several types, e.g. `["null", "integer"]`
    Multiple(Vec<JsonType>),
}

impl JsonTypeOrArray {
    /// Create a single type
    pub fn single(t: JsonType) -> Self {
        JsonTypeOrArray::Single(t)
    }

    /// Create a nullable type, null marker first
    pub fn nullable(t: JsonType) -> Self {
        if t == JsonType::Null {
            JsonTypeOrArray::Single(JsonType::Null)
        } else {
            JsonTypeOrArray::Multiple(vec![JsonType::Null, t])
        }
    }

    /// Check if this type is nullable
    pub fn is_nullable(&self) -> bool {
        match self {
            JsonTypeOrArray::Single(t) => *t == JsonType::Null,
            JsonTypeOrArray::Multiple(types) => types.contains(&JsonType::Null),
        }
    }

    /// Get the primary (non-null) type: the last one declared
    pub fn primary_type(&self) -> Option<JsonType> {
        match self {
            JsonTypeOrArray::Single(JsonType::Null) => None,
            JsonTypeOrArray::Single(t) => Some(*t),
            JsonTypeOrArray::Multiple(types) => {
                types.iter().rev().find(|t| **t != JsonType::Null).copied()
            }
        }
    }

    /// Declared types in order
    pub fn as_slice(&self) -> &[JsonType] {
        match self {
            JsonTypeOrArray::Single(t) => std::slice::from_ref(t),
            JsonTypeOrArray::Multiple(types) => types,
        }
    }
}

/// Declared type of one field
///
/// Serializes to `{"type": ["null", "integer"]}`, with `"format":
/// "date-time"` added for timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    /// Property type(s)
    #[serde(rename = "type")]
    pub json_type: JsonTypeOrArray,

    /// Format hint (only "date-time" is produced)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldType {
    /// Create a non-nullable field type
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type: JsonTypeOrArray::single(json_type),
            format: None,
        }
    }

    /// Create a nullable field type
    pub fn nullable(json_type: JsonType) -> Self {
        Self {
            json_type: JsonTypeOrArray::nullable(json_type),
            format: None,
        }
    }

    /// Nullable declaration for a resolved primitive type
    pub fn for_primitive(kind: PrimitiveType) -> Self {
        let field = Self::nullable(JsonType::from_primitive(kind));
        if kind == PrimitiveType::Timestamp {
            field.with_format(DATE_TIME_FORMAT)
        } else {
            field
        }
    }

    /// Set format hint
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Check if nullable
    pub fn is_nullable(&self) -> bool {
        self.json_type.is_nullable()
    }

    /// Declared types as the coercer sees them
    pub fn declared_types(&self) -> DeclaredTypes {
        let format = self.format.as_deref();
        match &self.json_type {
            JsonTypeOrArray::Single(JsonType::Null) => DeclaredTypes::Union(vec![None]),
            JsonTypeOrArray::Single(t) => {
                DeclaredTypes::Single(t.to_primitive(format).unwrap_or(PrimitiveType::String))
            }
            JsonTypeOrArray::Multiple(types) => {
                DeclaredTypes::Union(types.iter().map(|t| t.to_primitive(format)).collect())
            }
        }
    }

    /// The primitive type values of this field are coerced to
    pub fn primitive_type(&self) -> PrimitiveType {
        self.declared_types().desired_type()
    }
}

/// Declared type per field, for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldType>,
}

impl FieldSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn insert(&mut self, name: impl Into<String>, field: FieldType) {
        self.fields.insert(name.into(), field);
    }

    /// Get a field
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields.get(name)
    }

    /// Check if a field is declared
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldType)> {
        self.fields.iter()
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl FromIterator<(String, FieldType)> for FieldSchema {
    fn from_iter<I: IntoIterator<Item = (String, FieldType)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Top-level object schema for one stream: `{"type": "object", "properties": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSchema {
    /// Schema type (always "object")
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Field declarations
    #[serde(default)]
    pub properties: FieldSchema,
}

impl From<FieldSchema> for StreamSchema {
    fn from(properties: FieldSchema) -> Self {
        Self {
            json_type: JsonType::Object,
            properties,
        }
    }
}

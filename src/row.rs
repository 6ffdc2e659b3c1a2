//! Row conversion
//!
//! Applies a field schema to raw records, producing typed records with the
//! same keys.

use crate::convert::{coerce, DeclaredTypes};
use crate::error::{Error, Result};
use crate::schema::FieldSchema;
use crate::types::{RawRecord, TypedRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Converts records against one batch's schema
///
/// Declared types are resolved once up front and reused for every row.
#[derive(Debug, Clone)]
pub struct RowConverter {
    declared: BTreeMap<String, DeclaredTypes>,
}

impl RowConverter {
    /// Create a converter for a schema
    pub fn new(schema: &FieldSchema) -> Self {
        let declared = schema
            .iter()
            .map(|(name, field)| (name.clone(), field.declared_types()))
            .collect();
        Self { declared }
    }

    /// Convert one record
    ///
    /// Fails with [`Error::FieldNotInSchema`] if the record has a field the
    /// schema does not declare. No value-level problem is an error.
    pub fn convert(&self, record: &RawRecord) -> Result<TypedRecord> {
        record
            .iter()
            .map(|(key, raw)| {
                let declared = self
                    .declared
                    .get(key)
                    .ok_or_else(|| Error::field_not_in_schema(key))?;
                debug!(field = %key, value = ?raw, declared = ?declared, "converting value");
                Ok((key.clone(), coerce(raw.as_deref(), declared)))
            })
            .collect()
    }
}

/// Convert one record against a schema
///
/// ```
/// use solidafy_smart_csv::raw_record;
/// use solidafy_smart_csv::convert::TypedValue;
/// use solidafy_smart_csv::row::convert_row;
/// use solidafy_smart_csv::schema::generate_schema;
///
/// let schema = generate_schema(&vec![raw_record([("n", "1")])]);
/// let row = convert_row(&raw_record([("n", "42")]), &schema).unwrap();
/// assert_eq!(row["n"], TypedValue::Integer(42));
/// ```
pub fn convert_row(record: &RawRecord, schema: &FieldSchema) -> Result<TypedRecord> {
    RowConverter::new(schema).convert(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{PrimitiveType, TypedValue};
    use crate::schema::{generate_schema, FieldType, JsonType};
    use crate::types::raw_record;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_row_against_string_schema() {
        let records = vec![
            raw_record([("a", "1")]),
            raw_record([("a", "2.5")]),
            raw_record([("a", "x")]),
        ];
        let schema = generate_schema(&records);

        let row = convert_row(&raw_record([("a", "2.5")]), &schema).unwrap();

        assert_eq!(row.len(), 1);
        assert_eq!(row["a"], TypedValue::String("2.5".to_string()));
    }

    #[test]
    fn test_convert_row_typed_fields() {
        let mut schema = FieldSchema::new();
        schema.insert("id", FieldType::for_primitive(PrimitiveType::Integer));
        schema.insert("price", FieldType::for_primitive(PrimitiveType::Number));
        schema.insert("at", FieldType::for_primitive(PrimitiveType::Timestamp));
        schema.insert("note", FieldType::for_primitive(PrimitiveType::String));

        let mut record = raw_record([
            ("id", "7"),
            ("price", "3"),
            ("at", "2024-02-29 10:00:00"),
            ("note", ""),
        ]);
        record.insert("missing_value".to_string(), None);
        schema.insert("missing_value", FieldType::nullable(JsonType::Integer));

        let row = convert_row(&record, &schema).unwrap();

        assert_eq!(row["id"], TypedValue::Integer(7));
        assert_eq!(row["price"], TypedValue::Number(3.0));
        assert_eq!(
            row["at"].to_iso8601().as_deref(),
            Some("2024-02-29T10:00:00+00:00")
        );
        assert_eq!(row["note"], TypedValue::Null);
        assert_eq!(row["missing_value"], TypedValue::Null);
    }

    #[test]
    fn test_convert_row_keeps_key_set() {
        let schema = generate_schema(&vec![raw_record([("a", "1"), ("b", "2"), ("c", "3")])]);
        let record = raw_record([("a", "1"), ("c", "z")]);

        let row = convert_row(&record, &schema).unwrap();

        let keys: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
        // A bad value in one field does not affect the others
        assert_eq!(row["a"], TypedValue::Integer(1));
        assert_eq!(row["c"], TypedValue::String("z".to_string()));
    }

    #[test]
    fn test_convert_row_unknown_field_fails() {
        let schema = generate_schema(&vec![raw_record([("a", "1")])]);
        let record = raw_record([("a", "1"), ("b", "2")]);

        let err = convert_row(&record, &schema).unwrap_err();

        assert!(err.is_contract_violation());
        assert!(matches!(err, Error::FieldNotInSchema { ref field } if field == "b"));
    }

    #[test]
    fn test_row_converter_reuse() {
        let schema = generate_schema(&vec![raw_record([("n", "1.5")])]);
        let converter = RowConverter::new(&schema);

        let first = converter.convert(&raw_record([("n", "1")])).unwrap();
        let second = converter.convert(&raw_record([("n", "oops")])).unwrap();

        assert_eq!(first["n"], TypedValue::Number(1.0));
        assert_eq!(second["n"], TypedValue::String("oops".to_string()));
    }
}

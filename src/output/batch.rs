//! Arrow schema mapping and typed record to Arrow conversion
//!
//! Maps a resolved field schema onto Arrow types and builds RecordBatches
//! from typed records.

use crate::convert::{PrimitiveType, TypedValue};
use crate::error::Result;
use crate::schema::FieldSchema;
use crate::types::TypedRecord;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::warn;

/// Timezone attached to timestamp columns
pub const TIMESTAMP_TZ: &str = "+00:00";

/// Arrow DataType for a primitive type
pub fn arrow_data_type(kind: PrimitiveType) -> DataType {
    match kind {
        PrimitiveType::Integer => DataType::Int64,
        PrimitiveType::Number => DataType::Float64,
        PrimitiveType::Timestamp => {
            DataType::Timestamp(TimeUnit::Microsecond, Some(TIMESTAMP_TZ.into()))
        }
        PrimitiveType::String => DataType::Utf8,
    }
}

/// Arrow schema for a field schema
///
/// Columns follow field name order. Every column is nullable: any record may
/// leave any field empty.
pub fn arrow_schema(schema: &FieldSchema) -> Schema {
    let fields: Vec<Field> = schema
        .iter()
        .map(|(name, field)| Field::new(name, arrow_data_type(field.primitive_type()), true))
        .collect();
    Schema::new(fields)
}

/// Convert typed records to an Arrow RecordBatch
///
/// Fields missing from a record are null. A column holding a value of
/// another type (a string left behind by a failed coercion) is written as
/// Utf8 instead of its declared type, so the batch schema can differ from
/// [`arrow_schema`]. Integers in a number column are widened to floats.
pub fn typed_to_arrow(records: &[TypedRecord], schema: &FieldSchema) -> Result<RecordBatch> {
    if schema.is_empty() || records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(arrow_schema(schema))));
    }

    let mut fields = Vec::with_capacity(schema.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.len());

    for (name, field) in schema.iter() {
        let values: Vec<Option<&TypedValue>> =
            records.iter().map(|record| record.get(name)).collect();

        let declared = field.primitive_type();
        let mismatched = values
            .iter()
            .flatten()
            .filter(|v| !fits_column(v, declared))
            .count();

        let kind = if mismatched == 0 {
            declared
        } else {
            warn!(
                field = %name,
                declared = %declared,
                mismatched,
                rows = records.len(),
                "values outside the declared type; writing column as text"
            );
            PrimitiveType::String
        };

        fields.push(Field::new(name, arrow_data_type(kind), true));
        columns.push(build_array(&values, kind));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Check whether a value can be stored in a column of `kind`
fn fits_column(value: &TypedValue, kind: PrimitiveType) -> bool {
    match (value.primitive_type(), kind) {
        (None, _) | (_, PrimitiveType::String) => true,
        (Some(PrimitiveType::Integer), PrimitiveType::Number) => true,
        (Some(found), _) => found == kind,
    }
}

/// Build an Arrow array from typed values
fn build_array(values: &[Option<&TypedValue>], kind: PrimitiveType) -> ArrayRef {
    match kind {
        PrimitiveType::Integer => {
            let arr: Int64Array = values
                .iter()
                .map(|v| v.and_then(TypedValue::as_i64))
                .collect();
            Arc::new(arr)
        }

        PrimitiveType::Number => {
            let arr: Float64Array = values
                .iter()
                .map(|v| match v {
                    Some(TypedValue::Number(n)) => Some(*n),
                    Some(TypedValue::Integer(n)) => Some(*n as f64),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }

        PrimitiveType::Timestamp => {
            let arr: TimestampMicrosecondArray = values
                .iter()
                .map(|v| match v {
                    Some(TypedValue::Timestamp(ts)) => Some(ts.timestamp_micros()),
                    _ => None,
                })
                .collect();
            Arc::new(arr.with_timezone(TIMESTAMP_TZ))
        }

        PrimitiveType::String => {
            let arr: StringArray = values
                .iter()
                .map(|v| v.filter(|v| !v.is_null()).map(ToString::to_string))
                .collect();
            Arc::new(arr)
        }
    }
}

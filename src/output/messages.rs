//! Output messages
//!
//! Singer-style messages written one JSON object per line.

use crate::error::Result;
use crate::schema::StreamSchema;
use crate::types::{JsonValue, TypedRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A message emitted while reading
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Schema for the records that follow
    Schema {
        /// Stream name
        stream: String,
        /// Object schema
        schema: StreamSchema,
        /// Primary key fields
        key_properties: Vec<String>,
    },
    /// One typed record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: TypedRecord,
        /// When the record was read
        #[serde(skip_serializing_if = "Option::is_none")]
        time_extracted: Option<String>,
    },
    /// State update
    State {
        /// State data
        value: JsonValue,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: StreamSchema,
        key_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: TypedRecord) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: None,
        }
    }

    /// Create a record message stamped with an extraction time
    pub fn record_at(
        stream: impl Into<String>,
        record: TypedRecord,
        extracted: DateTime<Utc>,
    ) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: Some(extracted.to_rfc3339()),
        }
    }

    /// Create a state message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Serialize as one JSON line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

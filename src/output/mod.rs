//! Output module
//!
//! Handles how typed records leave the tap.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Singer-style JSON-lines messages (SCHEMA, RECORD, STATE)
//! - Mapping field schemas onto Arrow schemas
//! - Converting typed records to Arrow RecordBatches
//! - Writing Parquet files

mod batch;
mod messages;
mod writer;

pub use batch::{arrow_data_type, arrow_schema, typed_to_arrow, TIMESTAMP_TZ};
pub use messages::Message;
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};

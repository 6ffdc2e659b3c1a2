// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]
#![allow(clippy::unused_async)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy Smart CSV
//!
//! A tap for delimited text files whose columns carry no type information.
//! Types are inferred from a sample of each stream and applied to every row.
//!
//! ## Features
//!
//! - **Value Conversion**: integer, number, and timestamp parsing of raw text
//! - **Sampled Inference**: per-field type tallies widened to one type
//! - **Row Coercion**: every row converted against the inferred schema
//! - **Output**: JSON-lines messages or Arrow-backed Parquet files
//!
//! ## Quick Start
//!
//! ```rust
//! use solidafy_smart_csv::raw_record;
//! use solidafy_smart_csv::row::convert_row;
//! use solidafy_smart_csv::schema::generate_schema;
//!
//! let samples = vec![
//!     raw_record([("a", "1")]),
//!     raw_record([("a", "2.5")]),
//!     raw_record([("a", "x")]),
//! ];
//! let schema = generate_schema(&samples);
//! assert_eq!(
//!     schema.to_json(),
//!     serde_json::json!({"a": {"type": ["null", "string"]}})
//! );
//!
//! let row = convert_row(&raw_record([("a", "2.5")]), &schema).unwrap();
//! assert_eq!(row["a"].as_str(), Some("2.5"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  discover: files → sample → tally → resolve → catalog        │
//! │  read:     files → decode → row convert → messages / parquet │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬──────────────┬──┴───────────┬──────────┬─────────┐
//! │  Decode   │   Convert    │   Schema     │   Row    │ Output  │
//! ├───────────┼──────────────┼──────────────┼──────────┼─────────┤
//! │ CSV       │ convert      │ TypeTally    │ coerce   │ Message │
//! │ Quoting   │ convert_as   │ Widening     │ per row  │ Arrow   │
//! │ Headers   │ coerce       │ FieldSchema  │          │ Parquet │
//! └───────────┴──────────────┴──────────────┴──────────┴─────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Raw value conversion and coercion
pub mod convert;

/// Schema inference from sampled records
pub mod schema;

/// Row conversion against a schema
pub mod row;

/// Delimited text decoding
pub mod decode;

/// Record sampling
pub mod sample;

/// Local file discovery and reading
pub mod source;

/// Tap configuration
pub mod config;

/// Stream discovery and catalog
pub mod catalog;

/// Stream reading
pub mod sync;

/// Messages, Arrow, and Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{discover, discover_concurrent, Catalog, CatalogEntry};
pub use config::{load_config, TapConfig};
pub use convert::{coerce, convert, convert_as, PrimitiveType, TypedValue};
pub use row::{convert_row, RowConverter};
pub use schema::{generate_schema, FieldSchema, TypeTally};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Schema inference module
//!
//! Infers one declared type per field from a sample of raw records.
//!
//! # Features
//!
//! - **Type Tally**: counts, per field, how often each primitive type was seen
//! - **Tally Merging**: tallies from separate shards sum into one
//! - **Widening Lattice**: resolves observed type sets via a rule table
//! - **Nullable Output**: every resolved field is declared as `["null", type]`

mod resolver;
mod tally;
mod types;

pub use resolver::{
    generate_schema, pick_datatype, resolve_tally, SchemaResolver, WideningLattice,
};
pub use tally::{count_sample, count_samples, TypeCounts, TypeTally};
pub use types::{
    FieldSchema, FieldType, JsonType, JsonTypeOrArray, StreamSchema, DATE_TIME_FORMAT,
};

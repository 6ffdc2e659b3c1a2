//! Value conversion module
//!
//! Turns raw text tokens into typed values.
//!
//! # Overview
//!
//! - **Converter**: infers a value's natural type by trying parsers in a
//!   fixed priority order (integer, then number, then string). Timestamps are
//!   only recognised when explicitly requested.
//! - **Coercer**: applies a declared type (or nullable union) to a value.
//!
//! Both are total: malformed input is returned as a string, never an error.

mod coercer;
mod converter;
mod types;

pub use coercer::coerce;
pub use converter::{
    convert, convert_as, convert_with, parse_integer, parse_number, parse_timestamp, parser_for,
    Conversion, Parser, INFERENCE_ORDER,
};
pub use types::{DeclaredTypes, PrimitiveType, TypedValue};

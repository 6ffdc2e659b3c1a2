//! Record decoder module
//!
//! Turns delimited text into [`RawRecord`](crate::types::RawRecord)s.
//!
//! # Overview
//!
//! The decoder only splits text: every cell stays a string (or is absent
//! when a row is short). Deciding what the cells mean is left to the
//! inference core.

mod csv;

pub use csv::CsvDecoder;

#[cfg(test)]
mod tests;

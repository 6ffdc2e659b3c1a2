//! CLI module
//!
//! Command-line interface for the tap.
//!
//! # Commands
//!
//! - `discover` - Sample the configured files and print a catalog
//! - `read` - Convert every row and emit messages or Parquet files
//! - `infer` - Print the inferred schema of a single file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

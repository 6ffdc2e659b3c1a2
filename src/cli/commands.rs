//! CLI commands and argument parsing

use crate::sample::{DEFAULT_MAX_SAMPLES, DEFAULT_SAMPLE_RATE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Smart CSV tap CLI
#[derive(Parser, Debug)]
#[command(name = "smart-csv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample the configured files and print a catalog
    Discover {
        /// Configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Read data from streams
    Read {
        /// Configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Catalog file from a previous `discover` (discovers when omitted)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Streams to read (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Output directory for Parquet files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Infer the schema of one delimited file
    Infer {
        /// File to sample
        file: PathBuf,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Sample every Nth record
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: usize,

        /// Maximum records to sample
        #[arg(long, default_value_t = DEFAULT_MAX_SAMPLES)]
        max_samples: usize,
    },
}

/// Output format for `read`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON messages (one per line) on stdout
    Json,
    /// One Parquet file per stream
    Parquet,
}

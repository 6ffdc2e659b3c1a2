//! CLI runner - executes commands

use crate::catalog::{discover_concurrent, sample_file, Catalog};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, TapConfig};
use crate::decode::CsvDecoder;
use crate::error::{Error, Result};
use crate::output::ParquetWriterConfig;
use crate::sample::Sampler;
use crate::schema::resolve_tally;
use crate::sync::{file_for, read_stream, select_streams, write_stream_parquet, MessageSink};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover { config } => self.discover(config).await,
            Commands::Read {
                config,
                catalog,
                streams,
                format,
                output,
            } => {
                self.read(
                    config,
                    catalog.as_deref(),
                    streams.as_deref(),
                    *format,
                    output.as_deref(),
                )
                .await
            }
            Commands::Infer {
                file,
                delimiter,
                sample_rate,
                max_samples,
            } => self.infer(file, *delimiter, *sample_rate, *max_samples),
        }
    }

    /// Discover streams and print the catalog
    async fn discover(&self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path)?;
        let catalog = discover_concurrent(&config).await?;
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }

    /// Read streams as messages or Parquet files
    async fn read(
        &self,
        config_path: &Path,
        catalog_path: Option<&Path>,
        streams: Option<&str>,
        format: OutputFormat,
        output: Option<&Path>,
    ) -> Result<()> {
        let config = load_config(config_path)?;
        let catalog = Self::load_catalog(&config, catalog_path).await?;
        let selected = select_streams(&catalog, streams)?;

        match format {
            OutputFormat::Json => {
                let mut sink = MessageSink::new(io::stdout().lock());
                for entry in selected {
                    let rows = read_stream(file_for(&config, entry)?, entry)?;
                    sink.write_stream(entry, rows)?;
                }
                let _stdout = sink.finish()?;
            }
            OutputFormat::Parquet => {
                let dir = output
                    .ok_or_else(|| Error::config("Parquet format requires --output directory"))?;
                let writer_config = ParquetWriterConfig::new();
                for entry in selected {
                    let rows = read_stream(file_for(&config, entry)?, entry)?;
                    let path = write_stream_parquet(dir, entry, &rows, &writer_config)?;
                    info!(stream = %entry.stream, path = %path.display(), "stream written");
                }
            }
        }

        Ok(())
    }

    /// Use a saved catalog, or discover one from the config
    async fn load_catalog(config: &TapConfig, catalog_path: Option<&Path>) -> Result<Catalog> {
        match catalog_path {
            Some(path) => {
                debug!(path = %path.display(), "loading catalog");
                let content = fs::read_to_string(path).map_err(|_| Error::FileNotFound {
                    path: path.display().to_string(),
                })?;
                Ok(serde_json::from_str(&content)?)
            }
            None => discover_concurrent(config).await,
        }
    }

    /// Infer the schema of one file
    fn infer(
        &self,
        file: &Path,
        delimiter: char,
        sample_rate: usize,
        max_samples: usize,
    ) -> Result<()> {
        let sampler = Sampler::new()
            .with_sample_rate(sample_rate)
            .with_max_samples(max_samples);
        let decoder = CsvDecoder::with_options(delimiter, true);

        let tally = sample_file(file, &decoder, &sampler)?;
        let schema = resolve_tally(&tally);
        println!("{}", schema.to_json_pretty());
        Ok(())
    }
}

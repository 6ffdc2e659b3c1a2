//! Stream discovery
//!
//! Samples each stream's files, tallies the samples, and resolves a schema
//! per stream.

use crate::config::{FileConfig, TapConfig};
use crate::decode::CsvDecoder;
use crate::error::{Error, Result};
use crate::sample::Sampler;
use crate::schema::{resolve_tally, StreamSchema, TypeTally};
use crate::source::{list_files, read_records};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Discovered streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per stream
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Get a stream by name
    pub fn get_stream(&self, stream: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.stream == stream)
    }

    /// Get a stream by name, failing if it is not there
    pub fn require_stream(&self, stream: &str) -> Result<&CatalogEntry> {
        self.get_stream(stream).ok_or_else(|| Error::StreamNotFound {
            stream: stream.to_string(),
        })
    }

    /// Stream names in catalog order
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.stream.as_str()).collect()
    }
}

/// One discovered stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// Stream identifier (same as the name)
    pub tap_stream_id: String,

    /// Primary key fields present in the schema
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Resolved object schema
    pub schema: StreamSchema,
}

impl CatalogEntry {
    /// Build an entry from a stream's merged tally
    ///
    /// Configured keys the schema does not contain are dropped.
    pub fn from_tally(file: &FileConfig, tally: &TypeTally) -> Self {
        let properties = resolve_tally(tally);

        let key_properties = file
            .key_properties
            .iter()
            .filter(|key| {
                let known = properties.contains(key);
                if !known {
                    warn!(
                        stream = %file.table_name,
                        key = %key,
                        "key property not found in sampled data"
                    );
                }
                known
            })
            .cloned()
            .collect();

        Self {
            stream: file.table_name.clone(),
            tap_stream_id: file.table_name.clone(),
            key_properties,
            schema: properties.into(),
        }
    }
}

/// Sample one file and tally it
pub fn sample_file(
    path: impl AsRef<Path>,
    decoder: &CsvDecoder,
    sampler: &Sampler,
) -> Result<TypeTally> {
    let records = read_records(path, decoder)?;
    let mut tally = TypeTally::new();
    tally.extend(sampler.sample_iter(&records));
    Ok(tally)
}

/// Tally every file of a stream
pub fn tally_stream(file: &FileConfig, sampler: &Sampler) -> Result<TypeTally> {
    let decoder = file.decoder()?;
    list_files(&file.path, &file.regex()?)?
        .iter()
        .map(|path| sample_file(path, &decoder, sampler))
        .sum()
}

/// Discover one stream
pub fn discover_stream(file: &FileConfig, sampler: &Sampler) -> Result<CatalogEntry> {
    let tally = tally_stream(file, sampler)?;
    let entry = CatalogEntry::from_tally(file, &tally);
    info!(
        stream = %entry.stream,
        fields = entry.schema.properties.len(),
        "discovered stream"
    );
    Ok(entry)
}

/// Discover every configured stream
pub fn discover(config: &TapConfig) -> Result<Catalog> {
    let sampler = config.sampler();
    let streams = config
        .files
        .iter()
        .map(|file| discover_stream(file, &sampler))
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog { streams })
}

/// Discover every configured stream, sampling files concurrently
///
/// Each file is tallied on the blocking pool; per-file tallies are merged
/// into one tally per stream.
pub async fn discover_concurrent(config: &TapConfig) -> Result<Catalog> {
    let sampler = config.sampler();
    let mut streams = Vec::with_capacity(config.files.len());

    for file in &config.files {
        let decoder = file.decoder()?;
        let paths = list_files(&file.path, &file.regex()?)?;

        let tasks = paths.into_iter().map(|path| {
            let decoder = decoder.clone();
            async move {
                tokio::task::spawn_blocking(move || sample_file(&path, &decoder, &sampler))
                    .await
                    .map_err(|e| anyhow::anyhow!("sampling task failed: {e}"))?
            }
        });

        let tally: TypeTally = try_join_all(tasks).await?.into_iter().sum();
        let entry = CatalogEntry::from_tally(file, &tally);
        info!(
            stream = %entry.stream,
            fields = entry.schema.properties.len(),
            "discovered stream"
        );
        streams.push(entry);
    }

    Ok(Catalog { streams })
}

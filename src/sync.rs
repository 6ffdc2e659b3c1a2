//! Stream reading
//!
//! Reads every file of a discovered stream, converts each row against the
//! stream's schema, and hands the typed rows to an output.

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{FileConfig, TapConfig};
use crate::error::{Error, Result};
use crate::output::{typed_to_arrow, Message, ParquetWriter, ParquetWriterConfig};
use crate::row::RowConverter;
use crate::source::{list_files, read_records};
use crate::types::TypedRecord;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Pick the catalog entries to read
///
/// `streams` is a comma-separated list of names; `None` or an empty list
/// selects every stream in catalog order.
pub fn select_streams<'a>(
    catalog: &'a Catalog,
    streams: Option<&str>,
) -> Result<Vec<&'a CatalogEntry>> {
    let wanted: Vec<&str> = streams
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if wanted.is_empty() {
        return Ok(catalog.streams.iter().collect());
    }

    wanted
        .into_iter()
        .map(|name| catalog.require_stream(name))
        .collect()
}

/// Read and convert every row of a stream
pub fn read_stream(file: &FileConfig, entry: &CatalogEntry) -> Result<Vec<TypedRecord>> {
    let decoder = file.decoder()?;
    let converter = RowConverter::new(&entry.schema.properties);

    let mut rows = Vec::new();
    for path in list_files(&file.path, &file.regex()?)? {
        for record in read_records(&path, &decoder)? {
            rows.push(converter.convert(&record)?);
        }
    }

    info!(stream = %entry.stream, rows = rows.len(), "read stream");
    Ok(rows)
}

/// Writes streams as JSON-lines messages
///
/// Each stream gets a SCHEMA message followed by one RECORD per row;
/// [`MessageSink::finish`] writes the final STATE.
pub struct MessageSink<W: Write> {
    out: W,
    extracted: DateTime<Utc>,
    rows: BTreeMap<String, usize>,
}

impl<W: Write> MessageSink<W> {
    /// Create a sink stamping records with the current time
    pub fn new(out: W) -> Self {
        Self::with_extracted(out, Utc::now())
    }

    /// Create a sink stamping records with a fixed time
    pub fn with_extracted(out: W, extracted: DateTime<Utc>) -> Self {
        Self {
            out,
            extracted,
            rows: BTreeMap::new(),
        }
    }

    fn emit(&mut self, message: &Message) -> Result<()> {
        writeln!(self.out, "{}", message.to_json_line()?)?;
        Ok(())
    }

    /// Write one stream's schema and rows
    pub fn write_stream(&mut self, entry: &CatalogEntry, rows: Vec<TypedRecord>) -> Result<()> {
        self.emit(&Message::schema(
            entry.stream.clone(),
            entry.schema.clone(),
            entry.key_properties.clone(),
        ))?;

        let count = rows.len();
        for row in rows {
            self.emit(&Message::record_at(
                entry.stream.clone(),
                row,
                self.extracted,
            ))?;
        }

        *self.rows.entry(entry.stream.clone()).or_default() += count;
        Ok(())
    }

    /// Write the closing state and return the writer
    pub fn finish(mut self) -> Result<W> {
        let bookmarks: serde_json::Map<String, serde_json::Value> = self
            .rows
            .iter()
            .map(|(stream, rows)| (stream.clone(), json!({ "rows_read": rows })))
            .collect();
        self.emit(&Message::state(json!({ "bookmarks": bookmarks })))?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write one stream's rows to `<dir>/<stream>.parquet`
pub fn write_stream_parquet(
    dir: impl AsRef<Path>,
    entry: &CatalogEntry,
    rows: &[TypedRecord],
    config: &ParquetWriterConfig,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.parquet", entry.stream));

    // The batch schema may widen columns holding off-type values
    let batch = typed_to_arrow(rows, &entry.schema.properties)?;
    let mut writer = ParquetWriter::new(&path, batch.schema().as_ref(), config)?;
    writer.write(&batch)?;
    let written = writer.close()?;

    info!(stream = %entry.stream, rows = written, path = %path.display(), "wrote parquet");
    Ok(path)
}

/// Look up the file config backing a catalog entry
pub fn file_for<'a>(config: &'a TapConfig, entry: &CatalogEntry) -> Result<&'a FileConfig> {
    config
        .get_file(&entry.stream)
        .ok_or_else(|| Error::StreamNotFound {
            stream: entry.stream.clone(),
        })
}

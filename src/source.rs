//! Local file source
//!
//! Finds the files backing a stream and reads them into raw records.

use crate::decode::CsvDecoder;
use crate::error::{Error, Result, ResultExt};
use crate::types::RawRecord;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List files in `dir` whose name matches `pattern`, sorted by path
///
/// Subdirectories are not descended into.
pub fn list_files(dir: impl AsRef<Path>, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound {
            path: dir.display().to_string(),
        },
        _ => Error::Io(e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.is_match(name));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    debug!(dir = %dir.display(), pattern = %pattern, count = files.len(), "listed files");
    Ok(files)
}

/// Read and decode one file
pub fn read_records(path: impl AsRef<Path>, decoder: &CsvDecoder) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let body = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })?;

    decoder
        .decode(&body)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

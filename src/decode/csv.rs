//! CSV decoder
//!
//! Splits delimited text into raw records. Values are kept verbatim (no
//! trimming, no type guessing); typing is the inference core's job.

use crate::error::{Error, Result};
use crate::types::RawRecord;
use std::collections::HashSet;
use std::mem::take;
use tracing::warn;

/// CSV decoder with configurable delimiter and header handling
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: char,
    /// Whether the first row is a header
    has_header: bool,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with custom settings
    pub fn with_options(delimiter: char, has_header: bool) -> Self {
        Self {
            delimiter,
            has_header,
        }
    }

    /// Field delimiter
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Decode a CSV body into raw records
    ///
    /// Rows shorter than the header leave the missing fields absent. Cells
    /// beyond the header are dropped.
    pub fn decode(&self, body: &str) -> Result<Vec<RawRecord>> {
        let mut rows = parse_rows(body, self.delimiter)?.into_iter();

        let headers: Vec<String> = if self.has_header {
            match rows.next() {
                Some((_, header)) => dedupe_headers(
                    header
                        .iter()
                        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string()),
                ),
                None => return Ok(Vec::new()),
            }
        } else {
            // Generate numeric column names
            match rows.as_slice().first() {
                Some((_, first)) => (0..first.len()).map(|i| format!("column_{i}")).collect(),
                None => return Ok(Vec::new()),
            }
        };

        let mut records = Vec::new();
        for (line, fields) in rows {
            if fields.len() > headers.len() {
                warn!(
                    line,
                    expected = headers.len(),
                    found = fields.len(),
                    "dropping cells beyond the header"
                );
            }

            let mut fields = fields.into_iter();
            let record: RawRecord = headers
                .iter()
                .map(|header| (header.clone(), fields.next()))
                .collect();
            records.push(record);
        }

        Ok(records)
    }
}

/// Make header names unique
///
/// A repeated name gets the first free `_2`, `_3`, ... suffix so its column
/// is kept instead of overwriting the earlier one.
fn dedupe_headers(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let names: Vec<String> = names.into_iter().collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut headers = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.clone()) {
            headers.push(name);
            continue;
        }
        let renamed = (2..)
            .map(|n| format!("{name}_{n}"))
            .find(|candidate| !seen.contains(candidate))
            .unwrap_or_default();
        warn!(header = %name, renamed = %renamed, "duplicate header renamed");
        seen.insert(renamed.clone());
        headers.push(renamed);
    }

    headers
}

/// Split a CSV body into rows of fields, tagged with their starting line
///
/// Quoted fields may contain delimiters, newlines and `""` escapes. A quote
/// only opens a quoted section at the start of a field. Blank lines are
/// skipped.
fn parse_rows(body: &str, delimiter: char) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut quote_start = 1;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' if current.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
                quote_start = line;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(take(&mut current));
                push_row(&mut rows, row_start, take(&mut fields));
                quoted = false;
                line += 1;
                row_start = line;
            }
            c if c == delimiter => {
                fields.push(take(&mut current));
                quoted = false;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(Error::csv(quote_start, "unterminated quoted field"));
    }

    if !fields.is_empty() || !current.is_empty() || quoted {
        fields.push(current);
        push_row(&mut rows, row_start, fields);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        rows.push((line, fields));
    }
}

//! Tap configuration
//!
//! Loaded from YAML or JSON (picked by file extension):
//!
//! ```yaml
//! sample_rate: 5
//! max_sampled_rows: 1000
//! files:
//!   - table_name: orders
//!     path: ./data
//!     pattern: "orders.*\\.csv"
//!     delimiter: ","
//!     key_properties: [id]
//! ```

use crate::decode::CsvDecoder;
use crate::error::{Error, Result};
use crate::sample::{Sampler, DEFAULT_MAX_SAMPLES, DEFAULT_SAMPLE_RATE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete tap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Sample every Nth record during discovery
    #[serde(default = "default_sample_rate")]
    pub sample_rate: usize,

    /// Cap on sampled records per file
    #[serde(default = "default_max_sampled_rows")]
    pub max_sampled_rows: usize,

    /// One entry per stream
    #[serde(default)]
    pub files: Vec<FileConfig>,
}

fn default_sample_rate() -> usize {
    DEFAULT_SAMPLE_RATE
}

fn default_max_sampled_rows() -> usize {
    DEFAULT_MAX_SAMPLES
}

impl TapConfig {
    /// Parse a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TapConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(Error::missing_field("files"));
        }
        if self.sample_rate == 0 {
            return Err(Error::invalid_value("sample_rate", "must be at least 1"));
        }
        if self.max_sampled_rows == 0 {
            return Err(Error::invalid_value(
                "max_sampled_rows",
                "must be at least 1",
            ));
        }
        for file in &self.files {
            file.validate()?;
        }
        Ok(())
    }

    /// Sampler built from the sampling settings
    pub fn sampler(&self) -> Sampler {
        Sampler::new()
            .with_sample_rate(self.sample_rate)
            .with_max_samples(self.max_sampled_rows)
    }

    /// Get a stream's file config by table name
    pub fn get_file(&self, table_name: &str) -> Option<&FileConfig> {
        self.files.iter().find(|f| f.table_name == table_name)
    }
}

// ============================================================================
// Per-Stream Config
// ============================================================================

/// Files backing one stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Stream name
    pub table_name: String,

    /// Directory to scan
    pub path: PathBuf,

    /// Regex matched against file names in `path`
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Field delimiter (a single character)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,
}

fn default_pattern() -> String {
    r".*\.csv$".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl FileConfig {
    /// Check the entry
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(Error::missing_field("table_name"));
        }
        self.delimiter_char()?;
        self.regex()?;
        Ok(())
    }

    /// Delimiter as a char
    pub fn delimiter_char(&self) -> Result<char> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::invalid_value(
                "delimiter",
                format!(
                    "expected a single character for '{}', got {:?}",
                    self.table_name, self.delimiter
                ),
            )),
        }
    }

    /// Compiled file name pattern
    pub fn regex(&self) -> Result<Regex> {
        Ok(Regex::new(&self.pattern)?)
    }

    /// Decoder for this stream's files
    pub fn decoder(&self) -> Result<CsvDecoder> {
        Ok(CsvDecoder::with_options(self.delimiter_char()?, true))
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file, choosing the parser by extension
pub fn load_config(path: impl AsRef<Path>) -> Result<TapConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|_| Error::FileNotFound {
        path: path.display().to_string(),
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => TapConfig::from_yaml(&content),
        _ => TapConfig::from_json(&content),
    }
}

//! Error types for Solidafy Smart CSV
//!
//! Inference and coercion never fail on data: malformed values fall back to
//! strings. The only core error is converting a row against a schema that
//! lacks one of its fields. Everything else here belongs to the tap around
//! the core (config, files, CSV, output).

use thiserror::Error;

/// The main error type for Solidafy Smart CSV
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// A required config field is absent or blank
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Field name
        field: String,
    },

    /// A config field holds a value that cannot work
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Field name
        field: String,
        /// What is wrong
        message: String,
    },

    /// YAML could not be parsed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON could not be parsed or written
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A file name pattern is not a valid regex
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    /// Malformed CSV text
    #[error("CSV parsing error at line {line}: {message}")]
    CsvParse {
        /// 1-based line where the problem starts
        line: usize,
        /// What is wrong
        message: String,
    },

    /// A record carries a field the schema does not declare
    #[error("Field '{field}' is not declared in the schema")]
    FieldNotInSchema {
        /// Field name
        field: String,
    },

    /// No stream with this name
    #[error("Stream '{stream}' not found in catalog")]
    StreamNotFound {
        /// Stream name
        stream: String,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    /// Arrow failure
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet failure
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Output could not be written
    #[error("Output error: {message}")]
    Output {
        /// What is wrong
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File or directory does not exist
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path as given
        path: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Any other failure, usually with added context
    #[error("{0}")]
    Other(String),

    /// Error from an `anyhow` boundary
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parse error
    pub fn csv(line: usize, message: impl Into<String>) -> Self {
        Self::CsvParse {
            line,
            message: message.into(),
        }
    }

    /// Create a schema lookup error
    pub fn field_not_in_schema(field: impl Into<String>) -> Self {
        Self::FieldNotInSchema {
            field: field.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether this error signals a caller bug rather than bad input
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::FieldNotInSchema { .. })
    }
}

/// Result type alias for Solidafy Smart CSV
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

//! Loader error types.

use crate::domain::DataType;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that abort a configuration load. There is no partial result.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An input file does not exist.
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An input file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A malformed line in the datatype declaration file.
    #[error("Malformed schema line {line} in {}: {message}", path.display())]
    SchemaFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Malformed section/key-value text in a config file.
    #[error("Parse error at line {line} in {}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A value does not match its declared datatype.
    #[error("Invalid value for [{section}] {key} ({datatype}): {message}")]
    TypeCoercion {
        section: String,
        key: String,
        datatype: DataType,
        message: String,
    },

    /// A config key has no schema entry.
    #[error("No datatype declared for [{section}] {key}")]
    SchemaMismatch { section: String, key: String },

    /// A config file uses a section outside the whitelist.
    #[error("Unknown section [{0}]")]
    UnknownSection(String),

    /// Keys of the designated section missing from the final result.
    #[error("Unknown key(s) in section [{section}]: {}", keys.join(", "))]
    UnknownKeys { section: String, keys: Vec<String> },

    /// `get` asked for a key the result does not have.
    #[error("No such config key: {0}")]
    KeyNotFound(String),
}

//! Configuration loading and merging
//!
//! Reads the datatype schema, layers the customization file over the base
//! file, coerces every value to its declared type and validates the result.

use crate::error::{ConfigError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub mod coerce;
pub mod ini;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod validate;

pub use coerce::coerce;
pub use ini::RawStore;
pub use loader::{load_config, LoadOptions};
pub use merge::{build_result, merge};
pub use schema::load_schema;
pub use validate::{check_designated_keys, check_sections, validate};

/// Read a whole input file, mapping a missing file to its own error.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound { path: path.to_path_buf() },
        _ => ConfigError::Read { path: path.to_path_buf(), source },
    })
}

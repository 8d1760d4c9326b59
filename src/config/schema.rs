//! Datatype declaration loading
//!
//! The declaration file is pipe-delimited:
//!
//! ```text
//! [APY]
//! APY_URL | string
//! ENABLED_MODES | string[]
//! ```

use crate::domain::{DataType, Schema};
use crate::error::{ConfigError, Result};
use std::path::Path;

use super::read_source;

pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = read_source(path)?;
    let schema = parse_schema(&content, path)?;
    tracing::debug!(
        "Loaded schema from {} ({} sections)",
        path.display(),
        schema.sections().count()
    );
    Ok(schema)
}

pub fn parse_schema(content: &str, path: &Path) -> Result<Schema> {
    let mut schema = Schema::new();
    let mut section: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let err = |message: String| ConfigError::SchemaFormat {
            path: path.to_path_buf(),
            line: idx + 1,
            message,
        };

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        match parts.as_slice() {
            [header] => {
                let name = strip_delimiters(header)
                    .ok_or_else(|| err(format!("invalid section header '{}'", header)))?;
                schema.ensure_section(name);
                section = Some(name.to_string());
            }
            [key, datatype] => {
                let Some(current) = section.as_deref() else {
                    return Err(err(format!("key '{}' declared before any section", key)));
                };
                let datatype: DataType = datatype.parse().map_err(err)?;
                schema.declare(current, key, datatype);
            }
            _ => {
                return Err(err(format!(
                    "expected '[SECTION]' or 'key | datatype', found {} fields",
                    parts.len()
                )));
            }
        }
    }

    Ok(schema)
}

/// Drop one leading and one trailing character (`[APY]` -> `APY`).
fn strip_delimiters(header: &str) -> Option<&str> {
    let mut chars = header.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

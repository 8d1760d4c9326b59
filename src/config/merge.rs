//! Layering base and custom files into one typed, flat result

use crate::domain::{Layout, MergedConfig, Schema};
use crate::error::{ConfigError, Result};
use indexmap::IndexMap;
use std::path::Path;

use super::coerce::coerce;
use super::ini::RawStore;
use super::validate::check_sections;

/// Read `base` then `custom` into one store and build the typed result.
///
/// The section whitelist is checked before any coercion so an unknown
/// section is reported as such even when its keys have no schema entry.
pub fn merge(
    base: &Path,
    custom: &Path,
    schema: &Schema,
    layout: &Layout,
) -> Result<(RawStore, MergedConfig)> {
    let raw = read_layers(base, custom)?;
    check_sections(&raw, layout)?;
    let merged = build_result(&raw, schema, layout)?;
    Ok((raw, merged))
}

pub fn read_layers(base: &Path, custom: &Path) -> Result<RawStore> {
    let mut raw = RawStore::new();
    raw.read_file(base)?;
    raw.read_file(custom)?;
    Ok(raw)
}

/// Coerce and flatten every section of `raw` except the replacements
/// section, which is copied untyped under its own name.
pub fn build_result(raw: &RawStore, schema: &Schema, layout: &Layout) -> Result<MergedConfig> {
    let mut merged = MergedConfig::new(layout.replacements_section.clone());

    if let Some(replacements) = raw.section(&layout.replacements_section) {
        merged.replacements = replacements.clone();
    }

    // Remembers which section last wrote each flat key, for collision warnings.
    let mut origins: IndexMap<String, String> = IndexMap::new();

    for (section, entries) in raw.sections() {
        if section == layout.replacements_section {
            continue;
        }

        for (key, value) in entries {
            let datatype = schema.datatype(section, key).ok_or_else(|| {
                ConfigError::SchemaMismatch { section: section.to_string(), key: key.clone() }
            })?;
            let typed = coerce(value.as_deref(), datatype).map_err(|e| {
                ConfigError::TypeCoercion {
                    section: section.to_string(),
                    key: key.clone(),
                    datatype,
                    message: e.to_string(),
                }
            })?;

            if let Some(previous) = origins.insert(key.clone(), section.to_string()) {
                if previous != section {
                    tracing::warn!(
                        "Key '{}' from [{}] overrides the value from [{}]",
                        key,
                        section,
                        previous
                    );
                }
            }
            merged.values.insert(key.clone(), typed);
        }
    }

    tracing::debug!(
        "Merged {} typed keys, {} replacements",
        merged.values.len(),
        merged.replacements.len()
    );
    Ok(merged)
}

//! Content checks on the raw store and the merged result
//!
//! Only two checks run: every section must be on the layout's whitelist, and
//! every key of the designated section must reach the flattened result.
//! Other sections' keys are constrained by the schema lookup during merge,
//! not here.

use crate::domain::{Layout, MergedConfig};
use crate::error::{ConfigError, Result};
use std::collections::HashSet;

use super::ini::RawStore;

pub fn validate(raw: &RawStore, merged: &MergedConfig, layout: &Layout) -> Result<()> {
    check_sections(raw, layout)?;
    check_designated_keys(raw, merged, layout)
}

/// Fail on the first section (in store order) outside the whitelist.
pub fn check_sections(raw: &RawStore, layout: &Layout) -> Result<()> {
    match raw.sections().map(|(name, _)| name).find(|name| !layout.is_known_section(name)) {
        Some(unknown) => Err(ConfigError::UnknownSection(unknown.to_string())),
        None => Ok(()),
    }
}

/// Case-insensitive subset check of the designated section's keys against
/// the result's top-level keys. Reports every offending key at once.
pub fn check_designated_keys(raw: &RawStore, merged: &MergedConfig, layout: &Layout) -> Result<()> {
    let Some(section) = raw.section(&layout.designated_section) else {
        return Ok(());
    };

    let known: HashSet<String> = merged.keys().iter().map(|k| k.to_lowercase()).collect();
    let mut missing: Vec<String> = Vec::new();
    for key in section.keys() {
        let folded = key.to_lowercase();
        if !known.contains(&folded) && !missing.contains(&folded) {
            missing.push(folded);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::UnknownKeys { section: layout.designated_section.clone(), keys: missing })
    }
}

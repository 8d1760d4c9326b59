//! Config loading pipeline

use crate::domain::{Layout, MergedConfig};
use crate::error::Result;
use std::path::PathBuf;

use super::merge::merge;
use super::schema::load_schema;
use super::validate::check_designated_keys;

pub const DEFAULT_CONFIG: &str = "config.conf";
pub const DEFAULT_CUSTOM: &str = "custom.conf";
pub const DEFAULT_DTYPES: &str = "tools/conf-dtypes.txt";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub config: PathBuf,
    pub custom: PathBuf,
    pub dtypes: PathBuf,
    pub layout: Layout,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG),
            custom: PathBuf::from(DEFAULT_CUSTOM),
            dtypes: PathBuf::from(DEFAULT_DTYPES),
            layout: Layout::default(),
        }
    }
}

/// Load schema, merge both layers and validate. All or nothing.
///
/// `merge` already enforces the section whitelist, so only the designated
/// section's key check remains here.
pub fn load_config(options: &LoadOptions) -> Result<MergedConfig> {
    let schema = load_schema(&options.dtypes)?;
    let (raw, merged) = merge(&options.config, &options.custom, &schema, &options.layout)?;
    check_designated_keys(&raw, &merged, &options.layout)?;
    tracing::debug!(
        "Loaded {} over {}",
        options.custom.display(),
        options.config.display()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TypedValue;
    use crate::error::ConfigError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn options(dir: &Path) -> LoadOptions {
        LoadOptions {
            config: dir.join("config.conf"),
            custom: dir.join("custom.conf"),
            dtypes: dir.join("conf-dtypes.txt"),
            layout: Layout::default(),
        }
    }

    const DTYPES: &str = "\
[APY]
APY_URL | string
ENABLED | bool

[REPLACEMENTS]

[UTIL]
PORTS | int[]
";

    #[test]
    fn test_load_config_end_to_end() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("conf-dtypes.txt"), DTYPES).expect("write");
        fs::write(
            tmp.path().join("config.conf"),
            "[APY]\nAPY_URL = http://localhost\nENABLED = no\n\n[REPLACEMENTS]\nold = new\n\n[UTIL]\nPORTS = 80 443\n",
        )
        .expect("write");
        fs::write(tmp.path().join("custom.conf"), "[APY]\nENABLED = yes\n").expect("write");

        let merged = load_config(&options(tmp.path())).expect("load");
        assert_eq!(merged.values.get("ENABLED"), Some(&TypedValue::Bool(true)));
        assert_eq!(merged.values.get("PORTS"), Some(&TypedValue::IntArray(vec![80, 443])));
        assert_eq!(merged.replacements.get("old"), Some(&Some("new".to_string())));
    }

    #[test]
    fn test_load_config_missing_schema() {
        let tmp = TempDir::new().expect("tmp");
        let err = load_config(&options(tmp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { ref path } if path.ends_with("conf-dtypes.txt")));
    }

    #[test]
    fn test_default_paths() {
        let options = LoadOptions::default();
        assert_eq!(options.config, PathBuf::from("config.conf"));
        assert_eq!(options.custom, PathBuf::from("custom.conf"));
        assert_eq!(options.dtypes, PathBuf::from("tools/conf-dtypes.txt"));
    }
}

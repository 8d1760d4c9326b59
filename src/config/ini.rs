//! Section-delimited `key = value` text, read into an ordered raw store
//!
//! Reading several sources into the same [`RawStore`] layers them: keys from
//! a later source replace earlier ones in place, new sections and keys are
//! appended. Key case is preserved.

use crate::error::{ConfigError, Result};
use indexmap::{IndexMap, IndexSet};
use std::path::Path;

use super::read_source;

/// Raw values of one section. `None` marks a key written without a value.
pub type RawSection = IndexMap<String, Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStore {
    sections: IndexMap<String, RawSection>,
}

impl RawStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_file(&mut self, path: &Path) -> Result<()> {
        let content = read_source(path)?;
        self.read_str(&content, path)?;
        tracing::debug!("Read {} ({} sections so far)", path.display(), self.sections.len());
        Ok(())
    }

    /// Layer `content` onto the store. `origin` only labels errors.
    ///
    /// Nothing is written unless the whole source parses.
    pub fn read_str(&mut self, content: &str, origin: &Path) -> Result<()> {
        let parsed = parse_source(content, origin)?;
        for (name, entries) in parsed {
            let section = self.sections.entry(name).or_default();
            for (key, value) in entries {
                section.insert(key, value);
            }
        }
        Ok(())
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &RawSection)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.get(name)
    }

    #[cfg(test)]
    pub fn get(&self, section: &str, key: &str) -> Option<Option<&str>> {
        self.sections.get(section)?.get(key).map(|v| v.as_deref())
    }
}

/// The key whose value an indented line would continue.
struct OpenValue {
    key: String,
    indent: usize,
    pending_blank_lines: usize,
}

fn parse_source(content: &str, origin: &Path) -> Result<Vec<(String, Vec<(String, Option<String>)>)>> {
    let mut sections: Vec<(String, Vec<(String, Option<String>)>)> = Vec::new();
    let mut seen_sections: IndexSet<String> = IndexSet::new();
    let mut seen_keys: IndexSet<String> = IndexSet::new();
    let mut open: Option<OpenValue> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let err = |message: String| ConfigError::Parse {
            path: origin.to_path_buf(),
            line: idx + 1,
            message,
        };

        let line = raw_line.trim();
        let indent = raw_line.len() - raw_line.trim_start().len();

        if line.is_empty() {
            if let Some(open) = open.as_mut() {
                open.pending_blank_lines += 1;
            }
            continue;
        }
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(current) = open.as_mut().filter(|o| indent > o.indent) {
            let (_, entries) = sections.last_mut().ok_or_else(|| err("no open section".into()))?;
            let value = entries
                .iter_mut()
                .rev()
                .find(|(k, _)| *k == current.key)
                .and_then(|(_, v)| v.as_mut())
                .ok_or_else(|| {
                    err(format!("continuation line for key '{}' which has no value", current.key))
                })?;
            for _ in 0..current.pending_blank_lines {
                value.push('\n');
            }
            current.pending_blank_lines = 0;
            value.push('\n');
            value.push_str(line);
            continue;
        }
        open = None;

        if line.starts_with('[') {
            let name = section_name(line)
                .ok_or_else(|| err(format!("malformed section header '{}'", line)))?;
            if !seen_sections.insert(name.to_string()) {
                return Err(err(format!("section [{}] appears twice in this file", name)));
            }
            seen_keys.clear();
            sections.push((name.to_string(), Vec::new()));
            continue;
        }

        let Some((current_section, entries)) = sections.last_mut() else {
            return Err(err(format!("'{}' appears before any section header", line)));
        };

        let (key, value) = split_entry(line);
        if key.is_empty() {
            return Err(err(format!("missing key in '{}'", line)));
        }
        if !seen_keys.insert(key.to_string()) {
            return Err(err(format!(
                "key '{}' appears twice in section [{}] of this file",
                key, current_section
            )));
        }

        // Value-less keys stay open too so that an indented line after one
        // is reported instead of being read as a new key.
        open = Some(OpenValue { key: key.to_string(), indent, pending_blank_lines: 0 });
        entries.push((key.to_string(), value.map(str::to_string)));
    }

    Ok(sections)
}

/// `[NAME]` -> `NAME`: the text between the first `[` and the last `]`.
fn section_name(line: &str) -> Option<&str> {
    let end = line.rfind(']')?;
    let name = &line[1..end];
    (!name.is_empty()).then_some(name)
}

/// Split at the first `=` or `:`. No delimiter means a value-less key.
fn split_entry(line: &str) -> (&str, Option<&str>) {
    match line.find(&['=', ':'][..]) {
        Some(pos) => (line[..pos].trim(), Some(line[pos + 1..].trim())),
        None => (line.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read(content: &str) -> Result<RawStore> {
        let mut store = RawStore::new();
        store.read_str(content, Path::new("config.conf"))?;
        Ok(store)
    }

    #[test]
    fn test_reads_sections_and_values() {
        let store = read("[APY]\nAPY_URL = http://localhost:2737\nPORT: 80\n[UTIL]\nDEBUG=yes\n")
            .expect("store");
        assert_eq!(store.get("APY", "APY_URL"), Some(Some("http://localhost:2737")));
        assert_eq!(store.get("APY", "PORT"), Some(Some("80")));
        assert_eq!(store.get("UTIL", "DEBUG"), Some(Some("yes")));
        assert_eq!(store.sections().map(|(n, _)| n).collect::<Vec<_>>(), vec!["APY", "UTIL"]);
    }

    #[test]
    fn test_key_case_is_preserved() {
        let store = read("[S]\nCamelKey = 1\ncamelkey = 2\n").expect("store");
        assert_eq!(store.get("S", "CamelKey"), Some(Some("1")));
        assert_eq!(store.get("S", "camelkey"), Some(Some("2")));
    }

    #[test]
    fn test_value_less_key_vs_empty_value() {
        let store = read("[S]\nflag\nempty =\n").expect("store");
        assert_eq!(store.get("S", "flag"), Some(None));
        assert_eq!(store.get("S", "empty"), Some(Some("")));
    }

    #[test]
    fn test_first_delimiter_splits() {
        let store = read("[S]\nurl = http://host:80/a=b\n").expect("store");
        assert_eq!(store.get("S", "url"), Some(Some("http://host:80/a=b")));
    }

    #[test]
    fn test_comments_are_skipped() {
        let store = read("# leading\n[S]\n; note\nkey = value # not a comment\n").expect("store");
        assert_eq!(store.get("S", "key"), Some(Some("value # not a comment")));
        assert_eq!(store.section("S").map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_continuation_lines() {
        let store = read("[S]\nlist = a,\n    b,\n\n    c\nnext = 1\n").expect("store");
        assert_eq!(store.get("S", "list"), Some(Some("a,\nb,\n\nc")));
        assert_eq!(store.get("S", "next"), Some(Some("1")));
    }

    #[test]
    fn test_continuing_value_less_key_fails() {
        let err = read("[S]\nflag\n    more\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_text_before_section_fails() {
        let err = read("key = value\n[S]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_duplicate_section_in_one_file_fails() {
        assert!(read("[S]\na = 1\n[T]\n[S]\nb = 2\n").is_err());
    }

    #[test]
    fn test_duplicate_key_in_one_file_fails() {
        let err = read("[S]\na = 1\na = 2\n").unwrap_err();
        assert!(err.to_string().contains("'a' appears twice"), "{err}");
    }

    #[test]
    fn test_empty_key_fails() {
        assert!(read("[S]\n= value\n").is_err());
    }

    #[test]
    fn test_second_source_overrides_in_place() {
        let mut store = read("[S]\na = 1\nb = 2\n[T]\nc = 3\n").expect("store");
        store.read_str("[S]\nb = 20\nd = 4\n[U]\ne = 5\n", Path::new("custom.conf")).expect("layer");

        let keys: Vec<&str> =
            store.section("S").expect("S").keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "d"]);
        assert_eq!(store.get("S", "b"), Some(Some("20")));
        assert_eq!(
            store.sections().map(|(n, _)| n).collect::<Vec<_>>(),
            vec!["S", "T", "U"]
        );
    }

    #[test]
    fn test_failed_source_leaves_store_untouched() {
        let mut store = read("[S]\na = 1\n").expect("store");
        let before = store.clone();
        assert!(store.read_str("[S]\na = 2\nstray\n[S]\n", Path::new("custom.conf")).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_read_file_missing() {
        let tmp = TempDir::new().expect("tmp");
        let mut store = RawStore::new();
        let err = store.read_file(&tmp.path().join("custom.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.conf");
        fs::write(&path, "[S]\nx = 1\n").expect("write");
        let mut store = RawStore::new();
        store.read_file(&path).expect("read");
        assert_eq!(store.get("S", "x"), Some(Some("1")));
    }
}

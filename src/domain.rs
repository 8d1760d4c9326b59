//! Core data model: datatype tags, typed values, schema, layout and the merged result

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Schema-declared type of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    StringArray,
    Bool,
    Int,
    IntArray,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::StringArray => "string[]",
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::IntArray => "int[]",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(DataType::String),
            "string[]" | "string-array" => Ok(DataType::StringArray),
            "bool" => Ok(DataType::Bool),
            "int" => Ok(DataType::Int),
            "int[]" | "int-array" => Ok(DataType::IntArray),
            other => Err(format!(
                "unknown datatype '{}' (expected one of: string, string[], bool, int, int[])",
                other
            )),
        }
    }
}

/// A raw value coerced according to its declared [`DataType`].
///
/// `Null` is the absent marker: it becomes JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    StringArray(Vec<String>),
    IntArray(Vec<i64>),
}

impl TypedValue {
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Int(n) => Value::Number((*n).into()),
            TypedValue::StringArray(items) => {
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect())
            }
            TypedValue::IntArray(items) => {
                Value::Array(items.iter().map(|n| Value::Number((*n).into())).collect())
            }
        }
    }
}

/// `section -> key -> datatype`, built once from the declaration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    sections: IndexMap<String, IndexMap<String, DataType>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a section. Reopening keeps the keys already declared.
    pub fn ensure_section(&mut self, section: &str) {
        self.sections.entry(section.to_string()).or_default();
    }

    /// Declare `key` in `section`; a later declaration replaces an earlier one.
    pub fn declare(&mut self, section: &str, key: &str, datatype: DataType) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), datatype);
    }

    pub fn datatype(&self, section: &str, key: &str) -> Option<DataType> {
        self.sections.get(section)?.get(key).copied()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// Which section names are meaningful to the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Whitelist of section names allowed in either input file.
    pub known_sections: Vec<String>,
    /// The one section whose keys must all appear in the flattened result.
    pub designated_section: String,
    /// The section copied verbatim (untyped) under its own name.
    pub replacements_section: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            known_sections: ["APY", "PERSISTENCE", "REPLACEMENTS", "TRANSLATOR", "UTIL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            designated_section: "APY".to_string(),
            replacements_section: "REPLACEMENTS".to_string(),
        }
    }
}

impl Layout {
    pub fn is_known_section(&self, section: &str) -> bool {
        self.known_sections.iter().any(|known| known == section)
    }

    pub fn allow_section(mut self, section: impl Into<String>) -> Self {
        let section = section.into();
        if !self.is_known_section(&section) {
            self.known_sections.push(section);
        }
        self
    }
}

/// Keys owned by a downstream component (the web frontend fills these in at
/// runtime). The loader always leaves them unset; they are emitted as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalFields {
    pub lang_names: Option<Value>,
    pub locales: Option<Value>,
    pub pairs: Option<Value>,
    pub generators: Option<Value>,
    pub analyzers: Option<Value>,
    pub taggers: Option<Value>,
}

impl ExternalFields {
    pub const KEYS: [&'static str; 6] =
        ["LANGNAMES", "LOCALES", "PAIRS", "GENERATORS", "ANALYZERS", "TAGGERS"];

    pub fn entries(&self) -> [(&'static str, &Option<Value>); 6] {
        let [lang_names, locales, pairs, generators, analyzers, taggers] = Self::KEYS;
        [
            (lang_names, &self.lang_names),
            (locales, &self.locales),
            (pairs, &self.pairs),
            (generators, &self.generators),
            (analyzers, &self.analyzers),
            (taggers, &self.taggers),
        ]
    }
}

/// The final configuration: replacements, external placeholders and the
/// flat namespace of coerced values.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub replacements_section: String,
    pub replacements: IndexMap<String, Option<String>>,
    pub external: ExternalFields,
    pub values: IndexMap<String, TypedValue>,
}

impl MergedConfig {
    pub fn new(replacements_section: impl Into<String>) -> Self {
        Self {
            replacements_section: replacements_section.into(),
            replacements: IndexMap::new(),
            external: ExternalFields::default(),
            values: IndexMap::new(),
        }
    }

    /// Every top-level key of the result, in output order.
    pub fn keys(&self) -> Vec<String> {
        self.to_json_map().keys().cloned().collect()
    }

    /// Look up one top-level entry as JSON.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_json_map().get(key).cloned()
    }

    /// Build the output object. Flattened keys that shadow the replacements
    /// name or a reserved key take over that entry in place.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();

        let replacements: Map<String, Value> = self
            .replacements
            .iter()
            .map(|(k, v)| {
                let value = v.as_ref().map(|s| Value::String(s.clone())).unwrap_or(Value::Null);
                (k.clone(), value)
            })
            .collect();
        map.insert(self.replacements_section.clone(), Value::Object(replacements));

        for (key, value) in self.external.entries() {
            map.insert(key.to_string(), value.clone().unwrap_or(Value::Null));
        }

        for (key, value) in &self.values {
            map.insert(key.clone(), value.to_json());
        }

        map
    }
}

impl Serialize for MergedConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map().serialize(serializer)
    }
}

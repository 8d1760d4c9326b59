//! JSON and JS rendering of the merged config

use crate::domain::MergedConfig;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use std::io::{self, Write};

/// One-line JSON with `", "` / `": "` separators and non-ASCII escaped,
/// the layout downstream consumers of `json` output already parse.
pub fn render_json(config: &MergedConfig) -> serde_json::Result<String> {
    to_string_with(config, SpacedFormatter { ascii_only: true })
}

/// `var config = {...};` for embedding in a page, indented by four spaces.
pub fn render_js(config: &MergedConfig) -> serde_json::Result<String> {
    let body = to_string_with(config, PrettyFormatter::with_indent(b"    "))?;
    Ok(format!("var config = {};", body))
}

/// Print form of a single entry for `get`: strings bare, null as nothing,
/// arrays and objects as one-line JSON.
pub fn render_value(value: &Value) -> serde_json::Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            to_string_with(value, SpacedFormatter { ascii_only: false })
        }
    }
}

fn to_string_with<T: Serialize + ?Sized, F: Formatter>(
    value: &T,
    formatter: F,
) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

/// Compact layout with a space after each separator.
struct SpacedFormatter {
    ascii_only: bool,
}

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.ascii_only {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TypedValue;
    use serde_json::json;

    fn sample() -> MergedConfig {
        let mut config = MergedConfig::new("REPLACEMENTS");
        config.replacements.insert("Lang".to_string(), Some("Språk".to_string()));
        config.values.insert("x".to_string(), TypedValue::Int(2));
        config
            .values
            .insert("y".to_string(), TypedValue::StringArray(vec!["a".into(), "b".into()]));
        config.values.insert("on".to_string(), TypedValue::Bool(true));
        config.values.insert("none".to_string(), TypedValue::Null);
        config
    }

    #[test]
    fn test_render_json_layout() {
        let out = render_json(&sample()).expect("json");
        assert!(out.starts_with(r#"{"REPLACEMENTS": {"Lang": "Spr\u00e5k"}, "LANGNAMES": null, "#));
        assert!(out.ends_with(r#""x": 2, "y": ["a", "b"], "on": true, "none": null}"#), "{out}");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_render_json_parses_back() {
        let out = render_json(&sample()).expect("json");
        let value: Value = serde_json::from_str(&out).expect("parse");
        assert_eq!(value["REPLACEMENTS"]["Lang"], json!("Språk"));
        assert_eq!(value["y"], json!(["a", "b"]));
    }

    #[test]
    fn test_ascii_escape_uses_surrogate_pairs() {
        let mut config = MergedConfig::new("R");
        config.values.insert("e".to_string(), TypedValue::String("😀".to_string()));
        let out = render_json(&config).expect("json");
        assert!(out.contains(r#""e": "\ud83d\ude00""#), "{out}");
    }

    #[test]
    fn test_render_js_wraps_pretty_json() {
        let out = render_js(&sample()).expect("js");
        assert!(out.starts_with("var config = {\n    \"REPLACEMENTS\": {\n        \"Lang\": \"Språk\"\n    },\n"));
        assert!(out.ends_with("\n};"));
        assert!(out.contains("    \"y\": [\n        \"a\",\n        \"b\"\n    ],"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("text")).expect("v"), "text");
        assert_eq!(render_value(&json!(2)).expect("v"), "2");
        assert_eq!(render_value(&json!(false)).expect("v"), "false");
        assert_eq!(render_value(&Value::Null).expect("v"), "");
        assert_eq!(render_value(&json!([1, 2])).expect("v"), "[1, 2]");
        assert_eq!(render_value(&json!({"a": "b"})).expect("v"), r#"{"a": "b"}"#);
    }
}

//! Raw string to typed value coercion

use crate::domain::{DataType, TypedValue};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Array items are separated by runs of commas and/or spaces.
static ARRAY_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[, ]+").unwrap());

const TRUE_TOKENS: &[&str] = &["1", "yes", "true", "on"];
const FALSE_TOKENS: &[&str] = &["0", "no", "false", "off"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("a value is required")]
    Missing,

    #[error("'{0}' is not a boolean (expected 1/yes/true/on or 0/no/false/off)")]
    NotABoolean(String),

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
}

/// Coerce one raw value. `None` is a value-less key, `Some("")` an empty one.
pub fn coerce(raw: Option<&str>, datatype: DataType) -> Result<TypedValue, CoercionError> {
    match datatype {
        DataType::String => Ok(raw.map_or(TypedValue::Null, |s| TypedValue::String(s.to_string()))),
        DataType::Bool => parse_bool(raw.ok_or(CoercionError::Missing)?).map(TypedValue::Bool),
        DataType::Int => parse_int(raw.ok_or(CoercionError::Missing)?).map(TypedValue::Int),
        DataType::StringArray => Ok(raw.map_or(TypedValue::Null, |s| {
            TypedValue::StringArray(split_array(s).map(str::to_string).collect())
        })),
        DataType::IntArray => match raw {
            None => Ok(TypedValue::Null),
            Some(s) => split_array(s)
                .map(parse_int)
                .collect::<Result<Vec<_>, _>>()
                .map(TypedValue::IntArray),
        },
    }
}

/// Split on separator runs, dropping the empty fragments at either end.
pub fn split_array(raw: &str) -> impl Iterator<Item = &str> {
    ARRAY_SEPARATOR.split(raw).filter(|part| !part.is_empty())
}

fn parse_bool(raw: &str) -> Result<bool, CoercionError> {
    let token = raw.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Ok(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Ok(false)
    } else {
        Err(CoercionError::NotABoolean(raw.to_string()))
    }
}

fn parse_int(raw: &str) -> Result<i64, CoercionError> {
    raw.trim().parse::<i64>().map_err(|_| CoercionError::NotAnInteger(raw.to_string()))
}

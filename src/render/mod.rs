//! Output rendering (JSON, JS, single values)

pub mod json;

pub use json::{render_js, render_json, render_value};

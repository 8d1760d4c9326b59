//! read-conf: schema-typed, layered configuration loading
//!
//! A base config file is overridden by a customization file, every value is
//! coerced to the datatype declared for its `(section, key)` in a schema file,
//! and the result is flattened into one namespace ready to print as JSON.

pub mod config;
pub mod domain;
pub mod error;
pub mod render;

pub use config::{load_config, LoadOptions};
pub use domain::{DataType, Layout, MergedConfig, Schema, TypedValue};
pub use error::{ConfigError, Result};

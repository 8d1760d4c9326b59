//! `json` and `js` commands

use anyhow::{Context, Result};
use read_conf::render::{render_js, render_json};
use read_conf::MergedConfig;

pub fn json(config: &MergedConfig) -> Result<()> {
    let out = render_json(config).context("Failed to serialize config as JSON")?;
    println!("{}", out);
    Ok(())
}

pub fn js(config: &MergedConfig) -> Result<()> {
    let out = render_js(config).context("Failed to serialize config as JS")?;
    println!("{}", out);
    Ok(())
}

//! `get` command implementation

use anyhow::{Context, Result};
use clap::Args;
use read_conf::render::render_value;
use read_conf::{ConfigError, MergedConfig};

#[derive(Args)]
pub struct GetArgs {
    /// The key whose value you want to look up
    #[arg(value_name = "KEY")]
    pub key: String,
}

pub fn run(config: &MergedConfig, args: GetArgs) -> Result<()> {
    let value = config.get(&args.key).ok_or_else(|| ConfigError::KeyNotFound(args.key.clone()))?;
    let out = render_value(&value).with_context(|| format!("Failed to print value of {}", args.key))?;
    println!("{}", out);
    Ok(())
}

//! read-conf: print a layered, schema-typed configuration
//!
//! Loads `config.conf` overridden by `custom.conf`, types every value from the
//! datatype declarations and prints the result as JSON, as a JS variable, or
//! one key at a time for use in build scripts.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}

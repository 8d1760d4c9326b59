//! Command-line interface for read-conf
//!
//! Provides `json`, `js` and `get` subcommands over the loaded configuration.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use read_conf::config::loader::{DEFAULT_CONFIG, DEFAULT_CUSTOM, DEFAULT_DTYPES};
use read_conf::{load_config, Layout, LoadOptions, MergedConfig};

mod get;
mod print;

/// Load config, print stuff
#[derive(Parser)]
#[command(name = "read-conf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct SourceArgs {
    /// Config file name
    #[arg(short = 'c', long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Customization file name, overrides values from --config
    #[arg(short = 'C', long, value_name = "FILE", default_value = DEFAULT_CUSTOM)]
    custom: PathBuf,

    /// Datatype declarations for every (section, key)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DTYPES)]
    dtypes: PathBuf,

    /// Accept an extra section name besides the built-in ones (repeatable)
    #[arg(long = "allow-section", value_name = "NAME")]
    allow_sections: Vec<String>,
}

impl SourceArgs {
    fn load_options(&self) -> LoadOptions {
        let layout = self
            .allow_sections
            .iter()
            .fold(Layout::default(), |layout, section| layout.allow_section(section.as_str()));
        LoadOptions {
            config: self.config.clone(),
            custom: self.custom.clone(),
            dtypes: self.dtypes.clone(),
            layout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print config as json
    Json,

    /// Print config as js (with "var config =" first)
    Js,

    /// Print a specific config value
    Get(get::GetArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG sets the baseline (WARN when unset); --verbose adds DEBUG on top.
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    if cli.verbose {
        filter = filter.add_directive(Level::DEBUG.into());
    }
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(std::io::stderr().is_terminal()))
        .with(filter)
        .try_init();

    let Some(command) = cli.command else {
        println!("{}", Cli::command().render_usage());
        std::process::exit(2);
    };

    let config = load(&cli.sources)?;
    match command {
        Commands::Json => print::json(&config),
        Commands::Js => print::js(&config),
        Commands::Get(args) => get::run(&config, args),
    }
}

fn load(sources: &SourceArgs) -> Result<MergedConfig> {
    let options = sources.load_options();
    load_config(&options).with_context(|| {
        format!(
            "Failed to load {} + {} (datatypes from {})",
            options.config.display(),
            options.custom.display(),
            options.dtypes.display()
        )
    })
}

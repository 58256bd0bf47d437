//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use bundle_resolver::config::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILENAME};

use crate::commands;

/// Bundle Resolver - Compute the ordered file list of asset bundles
#[derive(Parser, Debug)]
#[command(name = "bundle-resolver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the project configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = CONFIG_ENV_VAR,
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    config: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve one or more bundles into their ordered file lists
    Resolve(commands::resolve::ResolveArgs),

    /// Show the dependency order of the installed components
    Order(commands::order::OrderArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Resolve(args) => commands::resolve::execute(&self.config, args),
            Commands::Order(args) => commands::order::execute(&self.config, args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialization (tests driving the CLI in-process) is harmless.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

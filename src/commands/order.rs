//! # Order Command Implementation
//!
//! This module implements the `order` subcommand, which prints the component
//! dependency order used when applying manifest commands: dependencies first,
//! then applications, then lower priority, then name.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use bundle_resolver::resolution::ordering::DependencyOrderer;

use super::{component_set, load_project};

/// Show the dependency order of a component set
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Comma-separated component set (defaults to every installed component)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub components: Option<Vec<String>>,
}

/// Execute the `order` command.
pub fn execute(config_path: &Path, args: OrderArgs) -> Result<()> {
    let project = load_project(config_path)?;
    let components = component_set(&project, args.components)?;

    let orderer = DependencyOrderer::new(&project.registry, project.cache.clone());
    let order = orderer
        .order(&components)
        .context("Failed to order components")?;

    for (position, name) in order.iter().enumerate() {
        println!("{:>3}. {}", position + 1, name);
    }
    Ok(())
}

//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `bundle-resolver` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The helpers below load the project configuration shared by the commands
//! that resolve anything.

pub mod completions;
pub mod order;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};

use bundle_resolver::config::{self, Project};
use bundle_resolver::registry::ComponentRegistry;
use bundle_resolver::suggestions;

/// Load the configuration file and everything it references.
pub fn load_project(config_path: &Path) -> Result<Project> {
    if !config_path.exists() {
        return Err(suggestions::config_not_found(config_path));
    }
    let project_config = config::from_file(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let project = project_config
        .load()
        .with_context(|| format!("Failed to load components listed in {}", config_path.display()))?;
    Ok(project)
}

/// The component set to resolve for: the requested one, or every installed
/// component.
pub fn component_set(project: &Project, requested: Option<Vec<String>>) -> Result<Vec<String>> {
    let installed = project.registry.installed_components();
    let Some(requested) = requested else {
        return Ok(installed);
    };
    let missing: Vec<String> = requested
        .iter()
        .filter(|c| !project.registry.is_installed(c))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(suggestions::not_installed(&missing, &installed));
    }
    Ok(requested)
}

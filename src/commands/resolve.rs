//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand, which prints the ordered
//! file list of one or more bundles.
//!
//! ## Functionality
//!
//! - **Several bundles at once**: Bundles are resolved in parallel and share
//!   one component order cache; output keeps the order of the arguments.
//! - **Asset class filtering**: `--css`, `--js` and `--xml` select classes;
//!   with none of them every class is included.
//! - **Output formats**: plain text (one path per line under a `# bundle`
//!   header) or JSON with the owning component of each file.
//!
//! This command is a read-only operation.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;

use bundle_resolver::asset_paths::AssetPathEntry;
use bundle_resolver::filesystem::DiskFS;
use bundle_resolver::resolution::{BundleResolver, Extensions};

use super::{component_set, load_project};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Text,
    /// JSON array of bundles with their entries
    Json,
}

/// Resolve bundles into ordered file lists
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Names of the bundles to resolve
    #[arg(required = true, value_name = "BUNDLE")]
    pub bundles: Vec<String>,

    /// Comma-separated component set (defaults to every installed component)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub components: Option<Vec<String>>,

    /// Include stylesheets (css, scss, sass, less)
    #[arg(long)]
    pub css: bool,

    /// Include scripts
    #[arg(long)]
    pub js: bool,

    /// Include templates
    #[arg(long)]
    pub xml: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ResolveArgs {
    fn extensions(&self) -> Extensions {
        let selected = Extensions {
            css: self.css,
            js: self.js,
            xml: self.xml,
        };
        if selected.is_empty() {
            Extensions::all()
        } else {
            selected
        }
    }
}

/// One resolved bundle, as printed
#[derive(Debug, Serialize)]
pub struct BundleOutput {
    pub bundle: String,
    pub files: Vec<AssetPathEntry>,
}

/// Execute the `resolve` command.
pub fn execute(config_path: &Path, args: ResolveArgs) -> Result<()> {
    let project = load_project(config_path)?;
    let components = component_set(&project, args.components.clone())?;
    let extensions = args.extensions();

    let files = DiskFS::new();
    let resolver = BundleResolver::new(
        &project.registry,
        &project.overrides,
        &files,
        project.cache.clone(),
    );

    let outputs = args
        .bundles
        .par_iter()
        .map(|bundle| -> Result<BundleOutput> {
            let files = resolver
                .resolve(bundle, &components, extensions)
                .with_context(|| format!("Failed to resolve bundle '{}'", bundle))?;
            Ok(BundleOutput {
                bundle: bundle.clone(),
                files,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    print!("{}", render(&outputs, args.format)?);
    Ok(())
}

/// Format resolved bundles for stdout.
pub fn render(outputs: &[BundleOutput], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(outputs)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut text = String::new();
            for output in outputs {
                if outputs.len() > 1 {
                    text.push_str(&format!("# {}\n", output.bundle));
                }
                for entry in &output.files {
                    text.push_str(&entry.path);
                    text.push('\n');
                }
            }
            Ok(text)
        }
    }
}

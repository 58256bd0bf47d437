//! # Project Configuration
//!
//! This module defines the `bundles.yaml` project file and turns it into the
//! collaborators a [`BundleResolver`](crate::resolution::BundleResolver)
//! needs.
//!
//! ```yaml
//! addons_paths: [addons, vendor/addons]
//! installed: [base, web, shop]
//! overrides:
//!   - name: patch core
//!     bundle: web.assets
//!     directive: after
//!     target: base/static/src/core.js
//!     path: shop/static/src/patch.js
//!     priority: 20
//! ```
//!
//! ## Key Components
//!
//! - **`ProjectConfig`**: The parsed document. Relative addons paths are
//!   resolved against the directory of the configuration file by
//!   [`from_file`].
//!
//! - **`Project`**: The loaded registry and override store, sharing one
//!   [`OrderCache`] so that edits to either drop stale component orders.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::OrderCache;
use crate::error::{Error, Result};
use crate::overrides::{MemoryOverrideStore, OverrideRecord};
use crate::registry::StaticRegistry;

/// Default file name of the project configuration
pub const DEFAULT_CONFIG_FILENAME: &str = "bundles.yaml";

/// Environment variable naming the project configuration file
pub const CONFIG_ENV_VAR: &str = "BUNDLE_RESOLVER_CONFIG";

/// The `bundles.yaml` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directories holding component directories, searched in order
    #[serde(default)]
    pub addons_paths: Vec<PathBuf>,
    /// Names of the installed components
    #[serde(default)]
    pub installed: Vec<String>,
    #[serde(default)]
    pub overrides: Vec<OverrideRecord>,
}

/// Everything a resolution needs, loaded from a [`ProjectConfig`]
#[derive(Debug)]
pub struct Project {
    pub registry: StaticRegistry,
    pub overrides: MemoryOverrideStore,
    pub cache: OrderCache,
}

/// Parse a YAML string into a [`ProjectConfig`].
pub fn parse(yaml_content: &str) -> Result<ProjectConfig> {
    serde_yaml::from_str(yaml_content).map_err(|e| {
        let message = e.to_string();
        let hint = parse_hint(&message);
        Error::ConfigParse { message, hint }
    })
}

fn parse_hint(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some("top-level keys are addons_paths, installed and overrides".to_string())
    } else if message.contains("unknown variant") {
        Some(
            "directive must be one of append, prepend, after, before, remove, replace, include"
                .to_string(),
        )
    } else if message.contains("missing field") {
        Some("override records need at least name, bundle and path".to_string())
    } else {
        None
    }
}

/// Read and parse a configuration file.
///
/// Relative entries of `addons_paths` are made absolute against the
/// directory containing `path`.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ProjectConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut config = parse(&content)?;

    let base_dir = std::path::absolute(path)?
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    config.addons_paths = config
        .addons_paths
        .into_iter()
        .map(|p| if p.is_absolute() { p } else { base_dir.join(p) })
        .collect();
    Ok(config)
}

impl ProjectConfig {
    /// Scan the addons paths and load the override records.
    pub fn load(&self) -> Result<Project> {
        let cache = OrderCache::new();
        let registry = StaticRegistry::scan(&self.addons_paths, &self.installed)?
            .with_cache(cache.clone());
        let overrides = MemoryOverrideStore::new().with_cache(cache.clone());
        for record in &self.overrides {
            overrides.create(record.clone())?;
        }
        debug!(
            "loaded {} override records from configuration",
            self.overrides.len()
        );
        Ok(Project {
            registry,
            overrides,
            cache,
        })
    }
}

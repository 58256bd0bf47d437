//! Component registry: which components exist, which are installed, and
//! their manifests
//!
//! A component is *known* when a manifest exists for it, and *installed*
//! when it is part of the installed set. Path expressions may only reach
//! into installed components.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::cache::OrderCache;
use crate::error::{Error, Result};
use crate::manifest::{ManifestEntry, MANIFEST_FILE};

/// Source of installed components and their manifests
pub trait ComponentRegistry: Send + Sync {
    /// Installed component names, sorted.
    fn installed_components(&self) -> Vec<String>;

    /// Manifest of a known component, installed or not.
    fn manifest(&self, name: &str) -> Option<&ManifestEntry>;

    fn is_installed(&self, name: &str) -> bool {
        self.installed_components().iter().any(|c| c == name)
    }
}

/// Registry held in memory, either built by hand or scanned from disk
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    manifests: BTreeMap<String, ManifestEntry>,
    installed: BTreeSet<String>,
    cache: Option<OrderCache>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the order cache to invalidate on (re)installation.
    pub fn with_cache(mut self, cache: OrderCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn invalidate(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.invalidate(),
            None => Ok(()),
        }
    }

    /// Make a component known without installing it.
    pub fn register(&mut self, manifest: ManifestEntry) -> Result<()> {
        self.manifests.insert(manifest.name.clone(), manifest);
        self.invalidate()
    }

    /// Register and install a component.
    pub fn install(&mut self, manifest: ManifestEntry) -> Result<()> {
        self.installed.insert(manifest.name.clone());
        self.register(manifest)
    }

    /// Remove a component from the installed set; its manifest stays known.
    pub fn uninstall(&mut self, name: &str) -> Result<bool> {
        let removed = self.installed.remove(name);
        self.invalidate()?;
        Ok(removed)
    }

    /// Builder-style [`StaticRegistry::install`] for tests and embedding.
    pub fn with_installed(mut self, manifest: ManifestEntry) -> Result<Self> {
        self.install(manifest)?;
        Ok(self)
    }

    /// Discover components below each addons path and install `installed`.
    ///
    /// A component is a direct subdirectory holding a `manifest.yaml`. When a
    /// name appears in several addons paths the first one wins.
    pub fn scan<P: AsRef<Path>>(addons_paths: &[P], installed: &[String]) -> Result<Self> {
        let mut registry = Self::new();
        for addons_path in addons_paths {
            let addons_path = addons_path.as_ref();
            for manifest_path in component_manifests(addons_path)? {
                let Some(name) = manifest_path
                    .parent()
                    .and_then(Path::file_name)
                    .and_then(|n| n.to_str())
                else {
                    continue;
                };
                if registry.manifests.contains_key(name) {
                    debug!(
                        "component '{}' in {} shadowed by an earlier addons path",
                        name,
                        addons_path.display()
                    );
                    continue;
                }
                let manifest = ManifestEntry::from_dir(name, addons_path)?;
                registry.manifests.insert(name.to_string(), manifest);
            }
        }

        for name in installed {
            if !registry.manifests.contains_key(name) {
                return Err(Error::InvalidInput {
                    message: format!("installed component '{}' has no manifest", name),
                });
            }
            registry.installed.insert(name.clone());
        }

        debug!(
            "registry: {} components known, {} installed",
            registry.manifests.len(),
            registry.installed.len()
        );
        Ok(registry)
    }
}

fn component_manifests(addons_path: &Path) -> Result<Vec<PathBuf>> {
    if !addons_path.is_dir() {
        warn!("addons path {} is not a directory", addons_path.display());
        return Ok(Vec::new());
    }

    let mut manifests = Vec::new();
    for entry in WalkDir::new(addons_path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_dir() {
            let manifest = entry.path().join(MANIFEST_FILE);
            if manifest.is_file() {
                manifests.push(manifest);
            }
        }
    }
    Ok(manifests)
}

impl ComponentRegistry for StaticRegistry {
    fn installed_components(&self) -> Vec<String> {
        self.installed.iter().cloned().collect()
    }

    fn manifest(&self, name: &str) -> Option<&ManifestEntry> {
        self.manifests.get(name)
    }

    fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(name)
    }
}

//! Resolution of one path expression into access-checked files
//!
//! The first segment of an expression names a component. Files are only
//! read from installed components, never from outside the component's own
//! directory, and templates only from its `static/` directory, so that view
//! definitions that are not meant to be public cannot leak into a bundle.
//!
//! Scripts and stylesheets come out as root-relative URLs
//! (`/web/static/src/app.js`); templates come out as absolute filesystem
//! paths since they are read server side.

use std::collections::BTreeSet;
use std::path::Path;

use log::{trace, warn};

use crate::error::{Error, Result};
use crate::filesystem::FileSource;
use crate::manifest::ManifestEntry;
use crate::path::{
    can_aggregate, fs_to_web, has_extension, is_wildcard, is_within, normalize, segments,
    AssetClass,
};
use crate::registry::ComponentRegistry;

/// Files produced by one path expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The known component named by the expression, if any
    pub component: Option<String>,
    pub paths: Vec<String>,
}

/// Expands path expressions against the registry and a file source
pub struct PathResolver<'a> {
    registry: &'a dyn ComponentRegistry,
    files: &'a dyn FileSource,
}

impl<'a> PathResolver<'a> {
    pub fn new(registry: &'a dyn ComponentRegistry, files: &'a dyn FileSource) -> Self {
        Self { registry, files }
    }

    /// Resolve `expr` into concrete paths.
    ///
    /// Fails with [`Error::AccessDenied`] when the expression names a known
    /// component that is not in `installed`. An expression that resolves to
    /// nothing is not an error; a warning is logged instead.
    pub fn resolve(
        &self,
        expr: &str,
        installed: &BTreeSet<String>,
        extensions: Option<&[&str]>,
    ) -> Result<ResolvedPaths> {
        let expr = fs_to_web(expr);
        let parts = segments(&expr);
        let manifest = parts.first().and_then(|name| self.registry.manifest(name));

        let (mut paths, safe) = match manifest {
            Some(manifest) => {
                if !installed.contains(&manifest.name) {
                    return Err(Error::AccessDenied {
                        component: manifest.name.clone(),
                        path: expr.clone(),
                    });
                }
                match self.expand(manifest, &parts)? {
                    Some((found, all_safe)) => (found, all_safe),
                    None => (Vec::new(), false),
                }
            }
            None => (Vec::new(), false),
        };

        if paths.is_empty() && !is_wildcard(&expr) && !can_aggregate(&expr) {
            paths.push(expr.clone());
        }

        if paths.is_empty() {
            let mut message = format!("the path \"{}\" did not resolve to anything.", expr);
            if !safe {
                message.push_str(" It may be due to security reasons.");
            }
            warn!("{}", message);
        }

        if let Some(extensions) = extensions {
            paths.retain(|path| has_extension(path, extensions));
        }

        Ok(ResolvedPaths {
            component: manifest.map(|m| m.name.clone()),
            paths,
        })
    }

    /// Glob the expression inside the component's directory.
    ///
    /// Returns `None` when the expression escapes the component directory,
    /// otherwise the surviving files and whether none had to be filtered out.
    fn expand(
        &self,
        manifest: &ManifestEntry,
        parts: &[&str],
    ) -> Result<Option<(Vec<String>, bool)>> {
        let addons_path = normalize(&manifest.addons_path);
        let root = addons_path.join(&manifest.name);
        let full = normalize(&parts.iter().fold(addons_path.clone(), |acc, p| acc.join(p)));

        if !is_within(&root, &full) {
            return Ok(None);
        }

        let relative = match full.strip_prefix(&addons_path) {
            Ok(relative) => fs_to_web(&relative.to_string_lossy()),
            Err(_) => return Ok(None),
        };

        let matches = self.files.glob(&addons_path, &relative)?;
        let static_root = root.join("static");
        let matched = matches.len();

        let paths: Vec<String> = matches
            .into_iter()
            .filter_map(|file| servable_path(&file, &addons_path, &static_root))
            .collect();
        trace!(
            "{}: {} matched, {} servable",
            relative,
            matched,
            paths.len()
        );

        let all_safe = paths.len() == matched;
        Ok(Some((paths, all_safe)))
    }
}

/// The path under which `file` is served, or `None` when it must not be.
fn servable_path(file: &Path, addons_path: &Path, static_root: &Path) -> Option<String> {
    let file_str = file.to_string_lossy();
    let class = AssetClass::of_path(&file_str)?;
    if class == AssetClass::Template && !is_within(static_root, file) {
        return None;
    }
    if class.is_web() {
        let relative = file.strip_prefix(addons_path).ok()?;
        Some(format!("/{}", fs_to_web(&relative.to_string_lossy())))
    } else {
        Some(file_str.into_owned())
    }
}

//! Bundle resolution: from a bundle name to its ordered list of files.
//!
//! ## Overview
//!
//! A bundle is assembled from three sources, applied in this order:
//!
//! 1. Active override records with a priority below
//!    [`DEFAULT_PRIORITY`](crate::overrides::DEFAULT_PRIORITY)
//! 2. The manifest commands of every requested component, visited in
//!    dependency order (see [`ordering`])
//! 3. The remaining active override records
//!
//! Each command resolves its path expression (see [`paths`]) and mutates a
//! shared [`AssetPaths`] accumulator. An `include` command recurses into
//! another bundle with the same accumulator, so the included files land
//! exactly where the `include` appears.
//!
//! `prepend` inserts at the start of the current bundle's contribution, not
//! at the start of the whole list. Content pulled in by an `include` counts
//! as already placed: a later `prepend` lands after it.
//!
//! The chain of bundles being resolved is passed down by value, which is
//! all the state needed to reject circular inclusion. Resolution is
//! therefore reentrant: one resolver can serve concurrent calls.

use std::collections::BTreeSet;

use log::debug;

use crate::asset_paths::{AssetPathEntry, AssetPaths};
use crate::cache::OrderCache;
use crate::error::{Error, Result};
use crate::filesystem::FileSource;
use crate::manifest::{Command, Directive};
use crate::overrides::OverrideStore;
use crate::path::{has_extension, SCRIPT_EXTENSIONS, STYLE_EXTENSIONS, TEMPLATE_EXTENSIONS};
use crate::registry::ComponentRegistry;

pub mod ordering;
pub mod paths;

pub use ordering::DependencyOrderer;
pub use paths::{PathResolver, ResolvedPaths};

/// Asset classes requested from a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extensions {
    pub css: bool,
    pub js: bool,
    pub xml: bool,
}

impl Extensions {
    pub fn all() -> Self {
        Self {
            css: true,
            js: true,
            xml: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.css || self.js || self.xml)
    }

    /// The file extensions covered by the requested classes.
    pub fn list(&self) -> Vec<&'static str> {
        let mut extensions = Vec::new();
        if self.js {
            extensions.extend_from_slice(SCRIPT_EXTENSIONS);
        }
        if self.xml {
            extensions.extend_from_slice(TEMPLATE_EXTENSIONS);
        }
        if self.css {
            extensions.extend_from_slice(STYLE_EXTENSIONS);
        }
        extensions
    }
}

/// Per-call inputs shared by every nested bundle
struct Context {
    /// Requested components in dependency order
    components: Vec<String>,
    /// Every installed component; path expressions may reach any of them
    installed: BTreeSet<String>,
    extensions: Vec<&'static str>,
}

/// Where a command came from, for diagnostics
#[derive(Clone, Copy)]
enum Origin<'s> {
    Override(&'s str),
    Component(&'s str),
}

/// Computes bundle file lists
pub struct BundleResolver<'a> {
    registry: &'a dyn ComponentRegistry,
    overrides: &'a dyn OverrideStore,
    paths: PathResolver<'a>,
    orderer: DependencyOrderer<'a>,
}

impl<'a> BundleResolver<'a> {
    pub fn new(
        registry: &'a dyn ComponentRegistry,
        overrides: &'a dyn OverrideStore,
        files: &'a dyn FileSource,
        cache: OrderCache,
    ) -> Self {
        Self {
            registry,
            overrides,
            paths: PathResolver::new(registry, files),
            orderer: DependencyOrderer::new(registry, cache),
        }
    }

    /// Dependency order of `components`.
    pub fn component_order<S: AsRef<str>>(&self, components: &[S]) -> Result<Vec<String>> {
        self.orderer.order(components)
    }

    /// Resolve `bundle` for `components` into its ordered file list.
    ///
    /// `components` must be installed. When no asset class is requested the
    /// result is empty.
    pub fn resolve<S: AsRef<str>>(
        &self,
        bundle: &str,
        components: &[S],
        extensions: Extensions,
    ) -> Result<Vec<AssetPathEntry>> {
        if bundle.is_empty() {
            return Err(Error::InvalidInput {
                message: "bundle name must not be empty".to_string(),
            });
        }

        let installed: BTreeSet<String> =
            self.registry.installed_components().into_iter().collect();
        if let Some(stray) = components
            .iter()
            .map(AsRef::as_ref)
            .find(|c| !installed.contains(*c))
        {
            return Err(Error::InvalidInput {
                message: format!("component '{}' is not installed", stray),
            });
        }

        if extensions.is_empty() {
            return Ok(Vec::new());
        }

        let context = Context {
            components: self.orderer.order(components)?,
            installed,
            extensions: extensions.list(),
        };

        let mut assets = AssetPaths::new();
        self.fill(bundle, &context, &mut assets, &[])?;
        debug!("bundle '{}' resolved to {} files", bundle, assets.len());
        Ok(assets.into_entries())
    }

    fn fill(
        &self,
        bundle: &str,
        context: &Context,
        assets: &mut AssetPaths,
        seen: &[String],
    ) -> Result<()> {
        let mut chain = seen.to_vec();
        chain.push(bundle.to_string());
        if seen.iter().any(|b| b == bundle) {
            return Err(Error::CircularBundle { chain });
        }

        let records: Vec<_> = self
            .overrides
            .overrides_for(bundle)?
            .into_iter()
            .filter(|r| r.active)
            .collect();
        let (early, late): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.is_early());

        let mut bundle_start = assets.len();

        for record in &early {
            let command = record.to_command()?;
            self.apply(
                &command,
                Origin::Override(&record.name),
                bundle,
                context,
                assets,
                &chain,
                &mut bundle_start,
            )?;
        }

        for component in &context.components {
            let Some(manifest) = self.registry.manifest(component) else {
                continue;
            };
            for command in manifest.commands(bundle) {
                self.apply(
                    command,
                    Origin::Component(component),
                    bundle,
                    context,
                    assets,
                    &chain,
                    &mut bundle_start,
                )?;
            }
        }

        for record in &late {
            let command = record.to_command()?;
            self.apply(
                &command,
                Origin::Override(&record.name),
                bundle,
                context,
                assets,
                &chain,
                &mut bundle_start,
            )?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply(
        &self,
        command: &Command,
        origin: Origin<'_>,
        bundle: &str,
        context: &Context,
        assets: &mut AssetPaths,
        chain: &[String],
        bundle_start: &mut usize,
    ) -> Result<()> {
        debug!(
            "{}: {} {} {}{}",
            bundle,
            origin,
            command.directive,
            command.path,
            command
                .target
                .as_ref()
                .map(|t| format!(" (target {})", t))
                .unwrap_or_default()
        );

        if command.directive == Directive::Include {
            self.fill(&command.path, context, assets, chain)?;
            *bundle_start = assets.len();
            return Ok(());
        }

        let extensions = context.extensions.as_slice();
        let resolved = self
            .paths
            .resolve(&command.path, &context.installed, Some(extensions))?;
        let owner = resolved.component.as_deref();

        let target = match (&command.target, command.directive.requires_target()) {
            (Some(target), true) => {
                let target_paths = self
                    .paths
                    .resolve(target, &context.installed, Some(extensions))?
                    .paths;
                if target_paths.is_empty() && !has_extension(target, extensions) {
                    debug!(
                        "{}: target {} is outside the requested asset classes, skipped",
                        bundle, target
                    );
                    return Ok(());
                }
                let target_paths = if target_paths.is_empty() {
                    vec![target.clone()]
                } else {
                    target_paths
                };
                let index = assets.index(&target_paths[0], bundle)?;
                Some((index, target_paths))
            }
            _ => None,
        };

        let paths = resolved.paths.as_slice();
        match (command.directive, target) {
            (Directive::Append, _) => assets.push(paths, owner, bundle),
            (Directive::Prepend, _) => assets.insert(paths, owner, bundle, *bundle_start),
            (Directive::Remove, _) => assets.remove(paths, bundle)?,
            (Directive::After, Some((index, _))) => assets.insert(paths, owner, bundle, index + 1),
            (Directive::Before, Some((index, _))) => assets.insert(paths, owner, bundle, index),
            (Directive::Replace, Some((index, target_paths))) => {
                assets.insert(paths, owner, bundle, index);
                assets.remove(&target_paths, bundle)?;
            }
            (directive, _) => {
                return Err(Error::InvalidCommand {
                    bundle: bundle.to_string(),
                    component: origin.to_string(),
                    message: format!("directive '{}' requires a target", directive),
                })
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Override(name) => write!(f, "override '{}'", name),
            Origin::Component(name) => f.write_str(name),
        }
    }
}

//! # Bundle Resolver Library
//!
//! This library computes the ordered list of static files (scripts,
//! stylesheets and templates) that make up a named asset bundle, given a set
//! of installed components. It is designed to be used by the
//! `bundle-resolver` command-line tool but can also be embedded by anything
//! that serves or packs bundles.
//!
//! ## Quick Example
//!
//! ```
//! use bundle_resolver::cache::OrderCache;
//! use bundle_resolver::filesystem::MemoryFS;
//! use bundle_resolver::manifest::{Command, ManifestEntry};
//! use bundle_resolver::overrides::MemoryOverrideStore;
//! use bundle_resolver::registry::StaticRegistry;
//! use bundle_resolver::resolution::{BundleResolver, Extensions};
//!
//! let files = MemoryFS::new()
//!     .with_file("/addons/base/static/src/core.js")
//!     .with_file("/addons/base/static/src/style.css");
//!
//! let registry = StaticRegistry::new()
//!     .with_installed(
//!         ManifestEntry::new("base", "/addons")
//!             .assets("web.assets", vec![Command::append("base/static/src/*")]),
//!     )
//!     .unwrap();
//! let overrides = MemoryOverrideStore::new();
//!
//! let resolver = BundleResolver::new(&registry, &overrides, &files, OrderCache::new());
//! let entries = resolver
//!     .resolve("web.assets", &["base"], Extensions::all())
//!     .unwrap();
//!
//! let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
//! assert_eq!(paths, vec!["/base/static/src/core.js", "/base/static/src/style.css"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: Each component declares its dependencies, a
//!   priority and, per bundle, an ordered list of asset commands.
//! - **Overrides (`overrides`)**: Stored directive records that patch a
//!   bundle before or after the manifests are applied.
//! - **Registry (`registry`)**: Which components are known and which are
//!   installed. Only installed components may contribute files.
//! - **Files (`filesystem`)**: Glob expansion over the real disk or an
//!   in-memory file set.
//! - **Resolution (`resolution`)**: Dependency ordering, path expansion with
//!   access checks, and the directive engine that assembles a bundle.
//! - **Configuration (`config`)**: The `bundles.yaml` project file.
//!
//! ## Execution Flow
//!
//! 1.  **Ordering**: Sort the requested components by dependency, with a
//!     deterministic tie-break (memoized in `cache`).
//! 2.  **Early overrides**: Apply override records with priority below 16.
//! 3.  **Manifests**: Apply each component's commands for the bundle, in
//!     dependency order, recursing into included bundles.
//! 4.  **Late overrides**: Apply the remaining override records.

pub mod asset_paths;
pub mod cache;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod manifest;
pub mod overrides;
pub mod path;
pub mod registry;
pub mod resolution;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;

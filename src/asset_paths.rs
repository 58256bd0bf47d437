//! Ordered, duplicate-free list of resolved asset paths
//!
//! Every directive of a bundle mutates one [`AssetPaths`] accumulator.
//! Uniqueness is keyed on the path alone: whichever component adds a path
//! first owns its position, later additions of the same path are ignored.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};

/// One resolved file of a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetPathEntry {
    /// Root-relative URL for scripts and styles, absolute path for templates
    pub path: String,
    /// Component whose path expression produced the entry, if any
    pub component: Option<String>,
    /// Bundle whose directive added the entry
    pub bundle: String,
}

/// The accumulator for a bundle resolution
#[derive(Debug, Clone, Default)]
pub struct AssetPaths {
    list: Vec<AssetPathEntry>,
    memo: HashSet<String>,
}

impl AssetPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.memo.contains(path)
    }

    pub fn entries(&self) -> &[AssetPathEntry] {
        &self.list
    }

    pub fn into_entries(self) -> Vec<AssetPathEntry> {
        self.list
    }

    /// Just the paths, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.list.iter().map(|e| e.path.as_str()).collect()
    }

    /// Position of `path`; fails when it is not part of the list.
    pub fn index(&self, path: &str, bundle: &str) -> Result<usize> {
        if !self.memo.contains(path) {
            return Err(Error::NotFound {
                path: path.to_string(),
                bundle: bundle.to_string(),
            });
        }
        self.list
            .iter()
            .position(|e| e.path == path)
            .ok_or_else(|| Error::NotFound {
                path: path.to_string(),
                bundle: bundle.to_string(),
            })
    }

    /// Append the paths not yet present, in input order.
    pub fn push(&mut self, paths: &[String], component: Option<&str>, bundle: &str) {
        for path in paths {
            if self.memo.insert(path.clone()) {
                self.list.push(entry(path, component, bundle));
            }
        }
    }

    /// Insert the paths not yet present, in input order, starting at `index`.
    ///
    /// `index` is clamped to the list length.
    pub fn insert(
        &mut self,
        paths: &[String],
        component: Option<&str>,
        bundle: &str,
        index: usize,
    ) {
        let mut at = index.min(self.list.len());
        for path in paths {
            if self.memo.insert(path.clone()) {
                self.list.insert(at, entry(path, component, bundle));
                at += 1;
            }
        }
    }

    /// Remove the given paths.
    ///
    /// Paths that are not present are ignored, unless none of the requested
    /// paths are present, in which case the call fails.
    pub fn remove(&mut self, paths: &[String], bundle: &str) -> Result<()> {
        let to_remove: HashSet<&str> = paths
            .iter()
            .map(String::as_str)
            .filter(|p| self.memo.contains(*p))
            .collect();

        if to_remove.is_empty() {
            if paths.is_empty() {
                return Ok(());
            }
            return Err(Error::NotFound {
                path: paths.join(", "),
                bundle: bundle.to_string(),
            });
        }

        self.list.retain(|e| !to_remove.contains(e.path.as_str()));
        for path in to_remove {
            self.memo.remove(path);
        }
        Ok(())
    }
}

fn entry(path: &str, component: Option<&str>, bundle: &str) -> AssetPathEntry {
    AssetPathEntry {
        path: path.to_string(),
        component: component.map(str::to_string),
        bundle: bundle.to_string(),
    }
}

//! Dependency order of components
//!
//! Manifest commands of a bundle are applied component by component, so the
//! component order decides the relative order of their files. Dependencies
//! always come first; among components whose dependencies are all placed, the
//! one with the lowest key `(not application, priority, name)` goes next.
//! That makes the order total and deterministic.
//!
//! Only dependency edges between members of the requested set count. A
//! component without a manifest depends on `base`.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::cache::{ComponentSetKey, OrderCache};
use crate::error::{Error, Result};
use crate::manifest::{default_depends, DEFAULT_MANIFEST_PRIORITY};
use crate::registry::ComponentRegistry;

/// Tie-break key among components ready to be placed
type SortKey = (bool, i64, String);

/// Orders component sets, memoizing results in an [`OrderCache`]
pub struct DependencyOrderer<'a> {
    registry: &'a dyn ComponentRegistry,
    cache: OrderCache,
}

impl<'a> DependencyOrderer<'a> {
    pub fn new(registry: &'a dyn ComponentRegistry, cache: OrderCache) -> Self {
        Self { registry, cache }
    }

    /// Dependency order of `components`, from the cache when possible.
    pub fn order<S: AsRef<str>>(&self, components: &[S]) -> Result<Vec<String>> {
        self.cache.get_or_compute(ComponentSetKey::new(components), || {
            topological_order(self.registry, components)
        })
    }
}

/// Order `components` by dependency, uncached.
pub fn topological_order<S: AsRef<str>>(
    registry: &dyn ComponentRegistry,
    components: &[S],
) -> Result<Vec<String>> {
    let candidates: BTreeSet<&str> = components.iter().map(AsRef::as_ref).collect();

    let mut keys: BTreeMap<&str, SortKey> = BTreeMap::new();
    let mut depends: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
    for &name in &candidates {
        let (deps, key) = match registry.manifest(name) {
            Some(manifest) => (
                manifest.depends_on.clone(),
                (!manifest.is_application, manifest.priority, name.to_string()),
            ),
            None => (
                default_depends(name),
                (true, DEFAULT_MANIFEST_PRIORITY, name.to_string()),
            ),
        };
        let deps = deps
            .into_iter()
            .filter(|dep| candidates.contains(dep.as_str()))
            .collect();
        keys.insert(name, key);
        depends.insert(name, deps);
    }

    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (&name, deps) in &depends {
        pending.insert(name, deps.len());
        for dep in deps {
            if let Some((&dep_name, _)) = keys.get_key_value(dep.as_str()) {
                dependents.entry(dep_name).or_default().push(name);
            }
        }
    }

    let mut ready: BTreeSet<&SortKey> = pending
        .iter()
        .filter(|(_, &count)| count == 0)
        .filter_map(|(name, _)| keys.get(name))
        .collect();

    let mut order = Vec::with_capacity(candidates.len());
    while let Some(key) = ready.pop_first() {
        let name = key.2.as_str();
        order.push(name.to_string());
        for &dependent in dependents.get(name).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    if let Some(dependent_key) = keys.get(dependent) {
                        ready.insert(dependent_key);
                    }
                }
            }
        }
    }

    if order.len() < candidates.len() {
        let placed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        let cycle = find_cycle(&depends, &placed);
        return Err(Error::Cycle { cycle });
    }

    debug!("component order: {}", order.join(", "));
    Ok(order)
}

/// Walk dependency edges among unplaced components until a node repeats.
///
/// Every unplaced component still waits on another unplaced one, so the
/// walk always closes a loop.
fn find_cycle(depends: &BTreeMap<&str, BTreeSet<String>>, placed: &BTreeSet<&str>) -> Vec<String> {
    let Some(start) = depends.keys().find(|name| !placed.contains(*name)) else {
        return Vec::new();
    };

    let mut path: Vec<String> = Vec::new();
    let mut current = start.to_string();
    loop {
        if let Some(pos) = path.iter().position(|n| *n == current) {
            let mut cycle = path.split_off(pos);
            cycle.push(current);
            return cycle;
        }
        path.push(current.clone());
        let next = depends
            .get(current.as_str())
            .and_then(|deps| deps.iter().find(|d| !placed.contains(d.as_str())));
        match next {
            Some(next) => current = next.clone(),
            None => return path,
        }
    }
}

//! Override records: administrator-authored directives layered over manifests
//!
//! Records with a priority below [`DEFAULT_PRIORITY`] are applied before
//! any component manifest, the others after all of them. The store is an
//! external concern; [`MemoryOverrideStore`] is the in-process implementation
//! used by the CLI and tests.

use crate::cache::OrderCache;
use crate::error::{Error, Result};
use crate::manifest::{Command, Directive};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Priority splitting "before manifests" from "after manifests".
pub const DEFAULT_PRIORITY: i64 = 16;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_active() -> bool {
    true
}

/// A persisted directive override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideRecord {
    /// Store-assigned identifier, used as the ordering tie-break
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub bundle: String,
    #[serde(default = "default_directive")]
    pub directive: Directive,
    /// Path expression (bundle name for `include`)
    pub path: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_directive() -> Directive {
    Directive::Append
}

impl OverrideRecord {
    /// An active `append` record at the default priority.
    pub fn new(name: &str, bundle: &str, path: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            bundle: bundle.to_string(),
            directive: Directive::Append,
            path: path.to_string(),
            target: None,
            active: true,
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.directive = directive;
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the record applies before component manifests.
    pub fn is_early(&self) -> bool {
        self.priority < DEFAULT_PRIORITY
    }

    /// Normalize into a [`Command`].
    pub fn to_command(&self) -> Result<Command> {
        Command::new(self.directive, self.target.clone(), self.path.clone()).map_err(|message| {
            Error::InvalidCommand {
                bundle: self.bundle.clone(),
                component: format!("override '{}'", self.name),
                message,
            }
        })
    }
}

/// Read access to override records
pub trait OverrideStore: Send + Sync {
    /// Every record of `bundle`, active or not, ordered by `(priority, id)`.
    fn overrides_for(&self, bundle: &str) -> Result<Vec<OverrideRecord>>;
}

/// In-memory override store
///
/// Every mutation invalidates the attached [`OrderCache`], if any.
#[derive(Debug, Clone, Default)]
pub struct MemoryOverrideStore {
    records: Arc<RwLock<Vec<OverrideRecord>>>,
    cache: Option<OrderCache>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the cache to invalidate on writes.
    pub fn with_cache(mut self, cache: OrderCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn poisoned() -> Error {
        Error::LockPoisoned {
            context: "override store".to_string(),
        }
    }

    fn invalidate(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.invalidate(),
            None => Ok(()),
        }
    }

    /// Store a new record and return its id.
    pub fn create(&self, mut record: OverrideRecord) -> Result<u64> {
        record.to_command()?;
        let id = {
            let mut records = self.records.write().map_err(|_| Self::poisoned())?;
            let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            record.id = id;
            records.push(record);
            id
        };
        self.invalidate()?;
        Ok(id)
    }

    /// Replace the record with the same id.
    pub fn write(&self, record: OverrideRecord) -> Result<()> {
        record.to_command()?;
        {
            let mut records = self.records.write().map_err(|_| Self::poisoned())?;
            let slot = records
                .iter_mut()
                .find(|r| r.id == record.id)
                .ok_or_else(|| Error::InvalidInput {
                    message: format!("no override record with id {}", record.id),
                })?;
            *slot = record;
        }
        self.invalidate()
    }

    /// Delete a record, returning whether it existed.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let removed = {
            let mut records = self.records.write().map_err(|_| Self::poisoned())?;
            let before = records.len();
            records.retain(|r| r.id != id);
            records.len() != before
        };
        self.invalidate()?;
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.records.read().map_err(|_| Self::poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn overrides_for(&self, bundle: &str) -> Result<Vec<OverrideRecord>> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        let mut matching: Vec<OverrideRecord> = records
            .iter()
            .filter(|r| r.bundle == bundle)
            .cloned()
            .collect();
        matching.sort_by_key(|r| (r.priority, r.id));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ComponentSetKey;

    #[test]
    fn test_early_and_late_records() {
        assert!(OverrideRecord::new("a", "web.assets", "x.js").priority(15).is_early());
        assert!(!OverrideRecord::new("a", "web.assets", "x.js").is_early());
        assert!(!OverrideRecord::new("a", "web.assets", "x.js").priority(20).is_early());
    }

    #[test]
    fn test_to_command_validates_target() {
        let record = OverrideRecord::new("bad", "web.assets", "x.js").directive(Directive::After);
        let err = record.to_command().unwrap_err();
        assert!(err.to_string().contains("override 'bad'"));

        let record = record.target("y.js");
        let command = record.to_command().unwrap();
        assert_eq!(command.target.as_deref(), Some("y.js"));
    }

    #[test]
    fn test_overrides_sorted_by_priority_then_id() {
        let store = MemoryOverrideStore::new();
        store
            .create(OverrideRecord::new("late", "web.assets", "c.js").priority(30))
            .unwrap();
        store
            .create(OverrideRecord::new("first", "web.assets", "a.js").priority(1))
            .unwrap();
        store
            .create(OverrideRecord::new("second", "web.assets", "b.js").priority(1))
            .unwrap();
        store
            .create(OverrideRecord::new("other", "web.other", "d.js"))
            .unwrap();

        let names: Vec<String> = store
            .overrides_for("web.assets")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_inactive_records_are_listed() {
        let store = MemoryOverrideStore::new();
        store
            .create(OverrideRecord::new("off", "web.assets", "a.js").active(false))
            .unwrap();
        assert_eq!(store.overrides_for("web.assets").unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_invalidate_cache() {
        let cache = OrderCache::new();
        let store = MemoryOverrideStore::new().with_cache(cache.clone());
        let key = ComponentSetKey::new(&["base"]);
        let fill = || cache.get_or_compute(key.clone(), || Ok(vec!["base".to_string()]));

        fill().unwrap();
        let id = store
            .create(OverrideRecord::new("a", "web.assets", "a.js"))
            .unwrap();
        assert!(cache.is_empty().unwrap());

        fill().unwrap();
        let mut record = store.overrides_for("web.assets").unwrap().remove(0);
        record.path = "b.js".to_string();
        store.write(record).unwrap();
        assert!(cache.is_empty().unwrap());

        fill().unwrap();
        assert!(store.delete(id).unwrap());
        assert!(cache.is_empty().unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_write_unknown_id_fails() {
        let store = MemoryOverrideStore::new();
        let mut record = OverrideRecord::new("a", "web.assets", "a.js");
        record.id = 42;
        assert!(matches!(store.write(record), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_deserialize_defaults() {
        let yaml = "name: n\nbundle: web.assets\npath: a.js\n";
        let record: OverrideRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.directive, Directive::Append);
        assert_eq!(record.priority, DEFAULT_PRIORITY);
        assert!(record.active);
    }
}

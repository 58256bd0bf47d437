//! File sources used for glob expansion
//!
//! Path expressions are expanded against a [`FileSource`]. [`DiskFS`] walks
//! the real filesystem, [`MemoryFS`] holds an in-memory file set so that
//! resolution can be exercised without touching the disk. Neither caches
//! anything between calls.
//!
//! Both use the same matching rules: `*` never crosses a `/`, `**` matches
//! any number of nested directories, and results come back sorted.

use crate::error::Result;
use glob::{MatchOptions, Pattern};
use log::{debug, trace};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Glob options shared by every file source.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Something that can expand a glob pattern into concrete files
pub trait FileSource: Send + Sync {
    /// Expand `pattern` (relative, `/`-separated) below `base`.
    ///
    /// `base` is taken literally, glob metacharacters in it are escaped.
    /// Only regular files are returned, sorted.
    fn glob(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Absolute pattern for `pattern` below `base`. A pattern glob cannot parse,
/// such as a file name with a lone `[`, is matched literally.
fn full_pattern(base: &Path, pattern: &str) -> String {
    let base = base.to_string_lossy();
    let base = Pattern::escape(base.trim_end_matches(['/', '\\']));
    let pattern = pattern.trim_start_matches('/');
    match Pattern::new(pattern) {
        Ok(_) => format!("{}/{}", base, pattern),
        Err(err) => {
            debug!("matching '{}' literally: {}", pattern, err);
            format!("{}/{}", base, Pattern::escape(pattern))
        }
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFS;

impl DiskFS {
    pub fn new() -> Self {
        Self
    }
}

impl FileSource for DiskFS {
    fn glob(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let full = full_pattern(base, pattern);
        let mut matches = Vec::new();
        for entry in glob::glob_with(&full, MATCH_OPTIONS)? {
            let path = entry?;
            if path.is_file() {
                trace!("glob {} matched {}", full, path.display());
                matches.push(path);
            }
        }
        matches.sort();
        Ok(matches)
    }
}

/// In-memory file set for fast, deterministic resolution
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Absolute file paths
    files: BTreeSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) {
        self.files.insert(path.as_ref().to_path_buf());
    }

    /// Builder-style variant of [`MemoryFS::add_file`]
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.add_file(path);
        self
    }

    /// Remove a file, returning whether it was present
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.files.remove(path.as_ref())
    }

    /// Check if a file exists
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.files.contains(path.as_ref())
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSource for MemoryFS {
    fn glob(&self, base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(&full_pattern(base, pattern))?;
        let matches = self
            .files
            .iter()
            .filter(|path| {
                path.to_str()
                    .is_some_and(|path_str| pattern.matches_with(path_str, MATCH_OPTIONS))
            })
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn memory_fs() -> MemoryFS {
        MemoryFS::new()
            .with_file("/addons/web/static/src/app.js")
            .with_file("/addons/web/static/src/core/registry.js")
            .with_file("/addons/web/static/src/core/deep/utils.js")
            .with_file("/addons/web/static/src/style.scss")
    }

    #[test]
    fn test_memory_single_star_is_one_level() {
        let fs = memory_fs();
        let matches = fs.glob(Path::new("/addons"), "web/static/src/*.js").unwrap();
        assert_eq!(matches, vec![PathBuf::from("/addons/web/static/src/app.js")]);
    }

    #[test]
    fn test_memory_double_star_is_recursive() {
        let fs = memory_fs();
        let matches = fs.glob(Path::new("/addons"), "web/static/src/**/*.js").unwrap();
        assert_eq!(
            matches,
            vec![
                PathBuf::from("/addons/web/static/src/app.js"),
                PathBuf::from("/addons/web/static/src/core/deep/utils.js"),
                PathBuf::from("/addons/web/static/src/core/registry.js"),
            ]
        );
    }

    #[test]
    fn test_memory_literal_pattern() {
        let fs = memory_fs();
        let matches = fs.glob(Path::new("/addons/"), "web/static/src/style.scss").unwrap();
        assert_eq!(matches.len(), 1);
        assert!(fs
            .glob(Path::new("/addons"), "web/static/src/missing.js")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_memory_base_metacharacters_are_literal() {
        let fs = MemoryFS::new().with_file("/opt/[x]/web/static/a.js");
        let matches = fs.glob(Path::new("/opt/[x]"), "web/static/*.js").unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_memory_unparsable_pattern_is_literal() {
        let fs = memory_fs().with_file("/addons/web/static/src/lib[.js");
        let matches = fs.glob(Path::new("/addons"), "web/static/src/lib[.js").unwrap();
        assert_eq!(matches, vec![PathBuf::from("/addons/web/static/src/lib[.js")]);
        assert!(fs
            .glob(Path::new("/addons"), "web/static/src/app[.js")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_memory_fs_bookkeeping() {
        let mut fs = MemoryFS::new();
        assert!(fs.is_empty());
        fs.add_file("/a/b.js");
        assert!(fs.exists("/a/b.js"));
        assert_eq!(fs.len(), 1);
        assert!(fs.remove_file("/a/b.js"));
        assert!(!fs.remove_file("/a/b.js"));
    }

    #[test]
    fn test_disk_glob_matches_files_only() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("web/static/src");
        fs::create_dir_all(src.join("nested.js")).unwrap();
        fs::create_dir_all(src.join("core")).unwrap();
        fs::write(src.join("b.js"), "").unwrap();
        fs::write(src.join("a.js"), "").unwrap();
        fs::write(src.join("core/c.js"), "").unwrap();

        let matches = DiskFS::new().glob(temp.path(), "web/static/src/*.js").unwrap();
        assert_eq!(matches, vec![src.join("a.js"), src.join("b.js")]);

        let matches = DiskFS::new().glob(temp.path(), "web/static/src/**/*.js").unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_disk_unparsable_pattern_is_literal() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("web/static/src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("lib[.js"), "").unwrap();

        let matches = DiskFS::new().glob(temp.path(), "web/static/src/lib[.js").unwrap();
        assert_eq!(matches, vec![src.join("lib[.js")]);
    }
}

//! Path manipulation utilities for bundle resolution
//!
//! Everything here is purely textual: no function touches the disk, so
//! path classification stays deterministic regardless of what is installed.

use std::path::{Component, Path, PathBuf};

/// Extensions served as scripts.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js"];

/// Extensions served as stylesheets.
pub const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];

/// Extensions read server side as templates.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["xml"];

/// Prefix of database-backed content URLs, which are never aggregated.
const WEB_CONTENT_PREFIX: &str = "/web/content";

/// Class of an asset file, decided by its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Script,
    Style,
    Template,
}

impl AssetClass {
    /// Classify an extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        if SCRIPT_EXTENSIONS.contains(&ext) {
            Some(AssetClass::Script)
        } else if STYLE_EXTENSIONS.contains(&ext) {
            Some(AssetClass::Style)
        } else if TEMPLATE_EXTENSIONS.contains(&ext) {
            Some(AssetClass::Template)
        } else {
            None
        }
    }

    /// Classify a path by its extension.
    pub fn of_path(path: &str) -> Option<Self> {
        extension_of(path).and_then(Self::from_extension)
    }

    /// Web classes are served over HTTP and emitted as root-relative URLs;
    /// templates are read from disk and emitted as absolute paths.
    pub fn is_web(self) -> bool {
        !matches!(self, AssetClass::Template)
    }
}

/// Convert a filesystem path string into web form (forward slashes only).
pub fn fs_to_web(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a path expression into its non-empty `/`-separated segments.
pub fn segments(expr: &str) -> Vec<&str> {
    expr.split('/').filter(|part| !part.is_empty()).collect()
}

/// Lexically normalize a path, resolving `.` and `..` without consulting
/// the filesystem. A `..` that would climb above the root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => out.push(".."),
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `path` lies strictly inside `root` once both are normalized.
///
/// The comparison is component-wise, so `/addons/web_editor` is not
/// considered inside `/addons/web`.
pub fn is_within(root: &Path, path: &Path) -> bool {
    let root = normalize(root);
    let path = normalize(path);
    path != root && path.starts_with(&root)
}

/// Whether the expression contains glob metacharacters.
pub fn is_wildcard(expr: &str) -> bool {
    expr.contains(['*', '?', '['])
}

/// Whether the expression denotes local content that may be aggregated into
/// a bundle: not an absolute URL, not protocol-relative and not a
/// database-backed `/web/content` path.
pub fn can_aggregate(expr: &str) -> bool {
    if expr.starts_with("//") || expr.starts_with(WEB_CONTENT_PREFIX) {
        return false;
    }
    url::Url::parse(expr).is_err()
}

/// Extension of the last segment of `path`, without the dot.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Whether `path` carries one of the given extensions.
pub fn has_extension(path: &str, extensions: &[&str]) -> bool {
    extension_of(path).is_some_and(|ext| extensions.contains(&ext))
}

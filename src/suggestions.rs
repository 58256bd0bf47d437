//! # Error Suggestions
//!
//! Helpers for CLI errors that say what went wrong and how to fix it.
//!
//! ```rust,ignore
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

/// Generate an error for when the configuration file is not found.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a bundles.yaml file listing addons_paths and installed components\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set BUNDLE_RESOLVER_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a component set naming components that are not
/// installed.
pub fn not_installed(missing: &[String], installed: &[String]) -> anyhow::Error {
    anyhow::anyhow!(
        "Component(s) not installed: {missing}\n\n\
         hint: Installed components are: {installed}\n\
         hint: Add the component to `installed` in the configuration file",
        missing = missing.join(", "),
        installed = if installed.is_empty() {
            "(none)".to_string()
        } else {
            installed.join(", ")
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let err = config_not_found(Path::new("/tmp/bundles.yaml"));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/bundles.yaml"));
        assert!(msg.contains("--config"));
        assert!(msg.contains("BUNDLE_RESOLVER_CONFIG"));
    }

    #[test]
    fn test_not_installed_lists_installed() {
        let err = not_installed(&["crm".to_string()], &["base".to_string(), "web".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("crm"));
        assert!(msg.contains("base, web"));

        let msg = not_installed(&["crm".to_string()], &[]).to_string();
        assert!(msg.contains("(none)"));
    }
}

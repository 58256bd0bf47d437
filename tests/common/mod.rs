//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a project fixture on disk: a `bundles.yaml`, an
//! `addons/` directory with component manifests, and their static files.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_shop_project();
//!     fixture.command_with_config().arg("resolve").arg("web.assets");
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::TestFixture;
}

/// Component manifests used across tests.
#[allow(dead_code)]
pub mod manifests {
    pub const BASE: &str = r##"
priority: 10
assets:
  web.assets:
    - base/static/src/core.js
    - base/static/src/**/*.scss
    - "# legacy entries below are disabled"
  web.common:
    - base/static/src/common.js
  web.templates:
    - base/static/src/**/*.xml
    - base/views/*.xml
"##;

    pub const SHOP: &str = r#"
depends: [base]
priority: 5
application: true
assets:
  web.assets:
    - [include, web.common]
    - shop/static/src/shop.js
    - [prepend, shop/static/src/polyfill.js]
"#;

    /// Installed nowhere; reachable only by breaking access rules.
    pub const CRM: &str = r#"
assets:
  web.assets:
    - crm/static/src/crm.js
"#;
}

/// A temporary project directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `bundles.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("bundles.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a component under `addons/` with the given manifest.
    pub fn with_component(self, name: &str, manifest: &str) -> Self {
        self.with_file(&format!("addons/{}/manifest.yaml", name), manifest)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// `base` and `shop` installed, `crm` present but not installed, and an
    /// override placing a patch right after the core script.
    #[allow(dead_code)]
    pub fn with_shop_project(self) -> Self {
        self.with_config(
            r#"
addons_paths: [addons]
installed: [base, shop]
overrides:
  - name: shop patch
    bundle: web.assets
    directive: after
    target: base/static/src/core.js
    path: shop/static/src/patch.js
    priority: 20
"#,
        )
        .with_component("base", manifests::BASE)
        .with_component("shop", manifests::SHOP)
        .with_component("crm", manifests::CRM)
        .with_file("addons/base/static/src/core.js", "")
        .with_file("addons/base/static/src/common.js", "")
        .with_file("addons/base/static/src/scss/theme.scss", "")
        .with_file("addons/base/static/src/templates.xml", "<templates/>")
        .with_file("addons/base/views/form.xml", "<odoo/>")
        .with_file("addons/shop/static/src/shop.js", "")
        .with_file("addons/shop/static/src/patch.js", "")
        .with_file("addons/shop/static/src/polyfill.js", "")
        .with_file("addons/crm/static/src/crm.js", "")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("bundles.yaml")
    }

    /// Get the path to the addons directory.
    #[allow(dead_code)]
    pub fn addons_path(&self) -> PathBuf {
        self.temp_dir.path().join("addons")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bundle-resolver");
        cmd.current_dir(self.path());
        cmd.env_remove("BUNDLE_RESOLVER_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Create a command with the config file path argument.
    #[allow(dead_code)]
    pub fn command_with_config(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }
}

//! # Component Manifests and Asset Commands
//!
//! A component declares its dependencies and, per bundle, a list of asset
//! commands in `manifest.yaml`. Commands are written in a compact form:
//!
//! - a bare string is an `append` of that path expression,
//! - a 2-element list is `[directive, path]`,
//! - a 3-element list is `[directive, target, path]`.
//!
//! A bare string starting with `#` is a comment and is skipped. Each raw
//! entry is normalized exactly once into a [`Command`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name of a component manifest inside the component directory.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Default manifest priority.
pub const DEFAULT_MANIFEST_PRIORITY: i64 = 100;

/// The verb of an asset command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    Append,
    Prepend,
    After,
    Before,
    Remove,
    Replace,
    Include,
}

impl Directive {
    /// `after`, `before` and `replace` position themselves relative to a target.
    pub fn requires_target(self) -> bool {
        matches!(self, Directive::After | Directive::Before | Directive::Replace)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Directive::Append => "append",
            Directive::Prepend => "prepend",
            Directive::After => "after",
            Directive::Before => "before",
            Directive::Remove => "remove",
            Directive::Replace => "replace",
            Directive::Include => "include",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directive {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "append" => Ok(Directive::Append),
            "prepend" => Ok(Directive::Prepend),
            "after" => Ok(Directive::After),
            "before" => Ok(Directive::Before),
            "remove" => Ok(Directive::Remove),
            "replace" => Ok(Directive::Replace),
            "include" => Ok(Directive::Include),
            other => Err(format!("unknown directive '{}'", other)),
        }
    }
}

/// Normalized asset command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub directive: Directive,
    /// Path expression the command is positioned against
    pub target: Option<String>,
    /// Path expression, or a bundle name for `include`
    pub path: String,
}

impl Command {
    /// Build a command, checking that the target is present exactly when
    /// the directive needs one.
    pub fn new(
        directive: Directive,
        target: Option<String>,
        path: impl Into<String>,
    ) -> std::result::Result<Self, String> {
        let path = path.into();
        if path.is_empty() {
            return Err(format!("directive '{}' has an empty path", directive));
        }
        match (directive.requires_target(), &target) {
            (true, None) => Err(format!("directive '{}' requires a target", directive)),
            (false, Some(t)) => Err(format!(
                "directive '{}' does not take a target (got '{}')",
                directive, t
            )),
            _ => Ok(Self {
                directive,
                target,
                path,
            }),
        }
    }

    pub fn append(path: impl Into<String>) -> Self {
        Self {
            directive: Directive::Append,
            target: None,
            path: path.into(),
        }
    }
}

/// A manifest entry as written in YAML, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCommand {
    /// A bare path expression
    Path(String),
    /// `[directive, path]` or `[directive, target, path]`
    Tuple(Vec<String>),
}

impl RawCommand {
    /// Comments are bare strings starting with `#`.
    pub fn is_comment(&self) -> bool {
        matches!(self, RawCommand::Path(p) if p.trim_start().starts_with('#'))
    }

    /// Normalize into a [`Command`]; comments yield `None`.
    pub fn normalize(&self) -> std::result::Result<Option<Command>, String> {
        match self {
            _ if self.is_comment() => Ok(None),
            RawCommand::Path(path) => {
                Ok(Some(Command::new(Directive::Append, None, path.clone())?))
            }
            RawCommand::Tuple(parts) => {
                let command = match parts.as_slice() {
                    [directive, path] => Command::new(directive.parse()?, None, path.clone())?,
                    [directive, target, path] => {
                        Command::new(directive.parse()?, Some(target.clone()), path.clone())?
                    }
                    _ => {
                        return Err(format!(
                            "expected 2 or 3 elements, got {} ({:?})",
                            parts.len(),
                            parts
                        ))
                    }
                };
                Ok(Some(command))
            }
        }
    }
}

impl From<&str> for RawCommand {
    fn from(path: &str) -> Self {
        RawCommand::Path(path.to_string())
    }
}

impl From<Command> for RawCommand {
    fn from(command: Command) -> Self {
        match (command.directive, command.target) {
            (Directive::Append, None) => RawCommand::Path(command.path),
            (directive, None) => RawCommand::Tuple(vec![directive.to_string(), command.path]),
            (directive, Some(target)) => {
                RawCommand::Tuple(vec![directive.to_string(), target, command.path])
            }
        }
    }
}

/// The on-disk shape of `manifest.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Components this one depends on; `[base]` when omitted
    #[serde(default)]
    pub depends: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub application: bool,
    /// Raw asset commands per bundle name
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<RawCommand>>,
}

/// Everything the resolver needs to know about one installed component
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub name: String,
    pub depends_on: Vec<String>,
    pub priority: i64,
    pub is_application: bool,
    /// Directory containing the component directory
    pub addons_path: PathBuf,
    pub assets: BTreeMap<String, Vec<Command>>,
}

/// Dependencies assumed for a component that declares none.
pub fn default_depends(name: &str) -> Vec<String> {
    if name == "base" {
        Vec::new()
    } else {
        vec!["base".to_string()]
    }
}

impl ManifestEntry {
    /// A manifest with default values and no assets.
    pub fn new(name: impl Into<String>, addons_path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            depends_on: default_depends(&name),
            name,
            priority: DEFAULT_MANIFEST_PRIORITY,
            is_application: false,
            addons_path: addons_path.into(),
            assets: BTreeMap::new(),
        }
    }

    pub fn depends(mut self, deps: &[&str]) -> Self {
        self.depends_on = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn application(mut self, is_application: bool) -> Self {
        self.is_application = is_application;
        self
    }

    /// Add commands to a bundle.
    pub fn assets(mut self, bundle: &str, commands: Vec<Command>) -> Self {
        self.assets
            .entry(bundle.to_string())
            .or_default()
            .extend(commands);
        self
    }

    /// Root directory of the component's files.
    pub fn root(&self) -> PathBuf {
        self.addons_path.join(&self.name)
    }

    /// Commands declared for `bundle`, in declaration order.
    pub fn commands(&self, bundle: &str) -> &[Command] {
        self.assets.get(bundle).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Normalize a parsed manifest file.
    pub fn from_file_contents(
        name: &str,
        addons_path: &Path,
        file: ManifestFile,
    ) -> Result<Self> {
        let mut assets = BTreeMap::new();
        for (bundle, raw_commands) in file.assets {
            let mut commands = Vec::with_capacity(raw_commands.len());
            for raw in &raw_commands {
                let command = raw.normalize().map_err(|message| Error::InvalidCommand {
                    bundle: bundle.clone(),
                    component: name.to_string(),
                    message,
                })?;
                commands.extend(command);
            }
            assets.insert(bundle, commands);
        }

        Ok(Self {
            name: name.to_string(),
            depends_on: file.depends.unwrap_or_else(|| default_depends(name)),
            priority: file.priority.unwrap_or(DEFAULT_MANIFEST_PRIORITY),
            is_application: file.application,
            addons_path: addons_path.to_path_buf(),
            assets,
        })
    }

    /// Parse manifest YAML for component `name` located in `addons_path`.
    ///
    /// An empty document is a manifest with every default.
    pub fn parse(name: &str, addons_path: &Path, yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Self::from_file_contents(name, addons_path, ManifestFile::default());
        }
        let file: ManifestFile = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
            message: format!("manifest of component '{}': {}", name, e),
            hint: None,
        })?;
        Self::from_file_contents(name, addons_path, file)
    }

    /// Read `<addons_path>/<name>/manifest.yaml`.
    pub fn from_dir(name: &str, addons_path: &Path) -> Result<Self> {
        let path = addons_path.join(name).join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)?;
        Self::parse(name, addons_path, &content)
    }
}

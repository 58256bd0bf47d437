//! # Error Handling
//!
//! This module defines the centralized error type for bundle resolution. It
//! uses the `thiserror` library to build an `Error` enum covering every
//! failure mode of a `resolve` call, each with enough context to locate the
//! offending manifest entry or override record.
//!
//! ## Key Components
//!
//! - **`Error`**: All possible errors. Resolution errors are deterministic:
//!   they come from bad input data (a malformed manifest or a faulty override
//!   record) and are never retried.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The fatal resolution errors are:
//!
//! - `AccessDenied`: a path expression reaches into a known component that
//!   is not installed.
//! - `NotFound`: a directive references a path missing from the bundle
//!   being assembled.
//! - `CircularBundle`: an `include` revisits a bundle already being resolved.
//! - `Cycle`: the component dependency graph is not acyclic.
//!
//! Any of them aborts the whole resolution; there is no partial result.

use thiserror::Error;

/// Main error type for bundle resolution
#[derive(Error, Debug)]
pub enum Error {
    /// A path expression targets a known component outside the installed set.
    #[error("Access denied: cannot fetch files from component '{component}' for path '{path}'")]
    AccessDenied { component: String, path: String },

    /// A directive referenced a path that is not part of the bundle.
    #[error("File(s) '{path}' not found in bundle '{bundle}'")]
    NotFound { path: String, bundle: String },

    /// An `include` directive would revisit a bundle of the active chain.
    #[error("Circular assets bundle declaration: {}", chain.join(" > "))]
    CircularBundle { chain: Vec<String> },

    /// The dependency graph among components contains a cycle.
    #[error("Cycle detected in component dependencies: {}", cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    /// A manifest entry or override record could not be normalized into a command.
    #[error("Invalid asset command in bundle '{bundle}' ({component}): {message}")]
    InvalidCommand {
        bundle: String,
        /// Component or override record the command came from
        component: String,
        message: String,
    },

    /// The caller violated the input contract of `resolve`.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The project configuration or a manifest file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// Walking the filesystem for a glob failed part way.
    #[error("Glob expansion error: {message}")]
    GlobIteration { message: String },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<glob::GlobError> for Error {
    fn from(err: glob::GlobError) -> Self {
        Error::GlobIteration {
            message: err.to_string(),
        }
    }
}

//! Error types and handling for stagehand
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`package`]: Requirement and package resolution errors
//! - [`deps`]: Dependency graph errors
//! - [`bindings`]: Bindings staging errors
//! - [`generator`]: Generator errors
//! - [`config`]: Manifest and recipe errors
//! - [`lockfile`]: Lockfile errors
//! - [`fs`]: File system errors
//! - [`cache`]: Package cache errors

pub mod bindings;
pub mod cache;
pub mod config;
pub mod deps;
pub mod fs;
pub mod generator;
pub mod lockfile;
pub mod package;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stagehand operations
#[derive(Error, Diagnostic, Debug)]
pub enum StagehandError {
    // Requirement / resolution errors
    #[error("Version conflict for '{name}': {existing} vs {requested}")]
    #[diagnostic(
        code(stagehand::package::version_conflict),
        help("Each package may be required at a single version; align the requirements that pull in '{name}'")
    )]
    VersionConflict {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("Package '{name}/{version}' not found: {reason}")]
    #[diagnostic(
        code(stagehand::package::not_found),
        help("Check the registry contains a recipe with a prebuilt binary or buildable sources")
    )]
    PackageNotFound {
        name: String,
        version: String,
        reason: String,
    },

    #[error("Option '{key}' rejected by package '{package}': {reason}")]
    #[diagnostic(code(stagehand::package::option_conflict))]
    OptionConflict {
        package: String,
        key: String,
        reason: String,
    },

    #[error("Package '{name}' has not been resolved")]
    #[diagnostic(
        code(stagehand::package::not_resolved),
        help("Bindings may only be staged from packages listed under 'requires'")
    )]
    PackageNotResolved { name: String },

    #[error("Invalid package reference: {reference}")]
    #[diagnostic(
        code(stagehand::package::invalid_reference),
        help("References use the form name/version, e.g. sdl/2.30.7")
    )]
    InvalidReference { reference: String, reason: String },

    // Dependency graph errors
    #[error("Circular dependency detected: {chain}")]
    #[diagnostic(
        code(stagehand::deps::circular),
        help("Remove the cycle from the recipes' requires lists")
    )]
    CircularDependency { chain: String },

    // Bindings errors
    #[error("Bindings source path not found: {path}")]
    #[diagnostic(
        code(stagehand::bindings::source_not_found),
        help("The 'from' subpath must exist inside the package installation of '{package}'")
    )]
    SourcePathNotFound { package: String, path: String },

    #[error("Failed to write bindings destination: {path}: {reason}")]
    #[diagnostic(code(stagehand::bindings::destination_write))]
    DestinationWriteError { path: String, reason: String },

    // Generator errors
    #[error("Unknown generator: {name}")]
    #[diagnostic(
        code(stagehand::generator::not_found),
        help("Available generators: cmake-toolchain, cmake-deps, json")
    )]
    GeneratorNotFound { name: String },

    #[error("Generator '{name}' is already registered")]
    #[diagnostic(code(stagehand::generator::duplicate))]
    DuplicateGenerator { name: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(stagehand::config::not_found),
        help("Create a stagehand.yaml in the project root or pass --project")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(stagehand::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(stagehand::config::invalid))]
    ConfigInvalid { message: String },

    // Lockfile errors
    #[error("Lockfile is out of date")]
    #[diagnostic(
        code(stagehand::lockfile::outdated),
        help("Run 'stagehand resolve' without --frozen to update the lockfile")
    )]
    LockfileOutdated,

    #[error("Lockfile is missing")]
    #[diagnostic(
        code(stagehand::lockfile::missing),
        help("Run 'stagehand resolve' without --frozen to generate a lockfile")
    )]
    LockfileMissing,

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(stagehand::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(stagehand::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(stagehand::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(stagehand::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for StagehandError {
    fn from(err: std::io::Error) -> Self {
        StagehandError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StagehandError {
    fn from(err: serde_yaml::Error) -> Self {
        StagehandError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StagehandError {
    fn from(err: serde_json::Error) -> Self {
        StagehandError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StagehandError>;

//! Configuration file handling for stagehand
//!
//! This module contains data structures for:
//! - `stagehand.yaml` - Project manifest (requirements, options, generators, bindings)
//! - `stagehand.lock` - Lockfile with the resolved package graph
//! - option override tables and `name/version` references shared by both

pub mod lockfile;
pub mod manifest;
pub mod options;
pub mod reference;

// Re-export commonly used types
pub use lockfile::{LockedPackage, Lockfile};
pub use manifest::{ProjectManifest, Requirement};
pub use options::{OptionTable, OptionValue};
pub use reference::PackageRef;

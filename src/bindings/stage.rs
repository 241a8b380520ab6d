//! Bindings sync
//!
//! Executes copy directives against resolved installations. Each directive is
//! independent: its source subpath is checked first (a missing subpath copies
//! nothing for that directive), then every file below it whose name matches the
//! glob is copied flattened into the destination. Earlier directives are not
//! rolled back when a later one fails.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use wax::{CandidatePath, Glob, Pattern};

use crate::cache::{PACKAGE_MARKER_FILE, PackageInstallation};
use crate::error::{Result, bindings, config, package};
use crate::fs::Filesystem;

use super::{CopyDirective, destination_subpath, source_subpath};

/// One file copy performed (or planned) by a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCopy {
    /// Index of the directive in declaration order
    pub directive: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Destination existed before this copy
    pub overwrote: bool,
}

/// Result of staging all directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingReport {
    pub copies: Vec<StagedCopy>,
    pub dry_run: bool,
}

impl StagingReport {
    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Copies that replaced an existing destination
    pub fn overwrites(&self) -> impl Iterator<Item = &StagedCopy> {
        self.copies.iter().filter(|c| c.overwrote)
    }

    /// Copies made by one directive
    pub fn for_directive(&self, index: usize) -> impl Iterator<Item = &StagedCopy> {
        self.copies.iter().filter(move |c| c.directive == index)
    }

    /// Destination state after staging: each destination mapped to the source
    /// of its last copy
    pub fn final_files(&self) -> BTreeMap<PathBuf, PathBuf> {
        self.copies
            .iter()
            .map(|c| (c.destination.clone(), c.source.clone()))
            .collect()
    }
}

/// Copy bindings into the project tree
///
/// # Errors
///
/// - `PackageNotResolved` when a directive names a package missing from `installations`
/// - `SourcePathNotFound` when `<installation>/<from>` does not exist
/// - `DestinationWriteError` when a destination folder or file cannot be written
pub fn stage_bindings(
    directives: &[CopyDirective],
    installations: &[PackageInstallation],
    project_root: &Path,
    fs: &dyn Filesystem,
) -> Result<StagingReport> {
    run(directives, installations, project_root, fs, false)
}

/// Compute the copies `stage_bindings` would make without writing anything
pub fn plan_bindings(
    directives: &[CopyDirective],
    installations: &[PackageInstallation],
    project_root: &Path,
    fs: &dyn Filesystem,
) -> Result<StagingReport> {
    run(directives, installations, project_root, fs, true)
}

fn run(
    directives: &[CopyDirective],
    installations: &[PackageInstallation],
    project_root: &Path,
    fs: &dyn Filesystem,
    dry_run: bool,
) -> Result<StagingReport> {
    let mut report = StagingReport {
        copies: Vec::new(),
        dry_run,
    };
    // Destinations written earlier in this run
    let mut written: HashSet<PathBuf> = HashSet::new();

    for (index, directive) in directives.iter().enumerate() {
        directive
            .validate()
            .map_err(|reason| config::invalid(format!("bindings[{index}]: {reason}")))?;

        let installation = installations
            .iter()
            .find(|inst| inst.name == directive.package)
            .ok_or_else(|| package::not_resolved(&directive.package))?;

        let source_root = source_subpath(&directive.from)
            .map(|sub| installation.folder.join(sub))
            .unwrap_or_else(|| installation.folder.clone());
        if !fs.is_dir(&source_root) {
            return Err(bindings::source_path_not_found(
                &directive.package,
                source_root.display().to_string(),
            ));
        }

        let destination_root = destination_subpath(&directive.to)
            .map(|sub| project_root.join(sub))
            .unwrap_or_else(|| project_root.to_path_buf());

        let matches = matching_files(directive, &source_root, fs)?;
        tracing::info!(
            package = %directive.package,
            pattern = %directive.pattern,
            from = %source_root.display(),
            to = %destination_root.display(),
            matched = matches.len(),
            dry_run,
            "staging bindings"
        );

        if matches.is_empty() {
            continue;
        }

        if !dry_run {
            fs.create_dir_all(&destination_root).map_err(|e| {
                bindings::destination_write(destination_root.display().to_string(), e.to_string())
            })?;
        }

        for source in matches {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let destination = destination_root.join(file_name);
            let overwrote = written.contains(&destination) || fs.exists(&destination);

            if !dry_run {
                fs.copy_file(&source, &destination).map_err(|e| {
                    bindings::destination_write(destination.display().to_string(), e.to_string())
                })?;
            }
            tracing::debug!(
                source = %source.display(),
                destination = %destination.display(),
                overwrote,
                "copied"
            );

            written.insert(destination.clone());
            report.copies.push(StagedCopy {
                directive: index,
                source,
                destination,
                overwrote,
            });
        }
    }

    Ok(report)
}

fn matching_files(
    directive: &CopyDirective,
    source_root: &Path,
    fs: &dyn Filesystem,
) -> Result<Vec<PathBuf>> {
    let glob = Glob::new(&directive.pattern)
        .map_err(|e| config::invalid(format!("invalid pattern '{}': {e}", directive.pattern)))?;

    let files = fs.walk_files(source_root)?;
    Ok(files
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .filter(|name| *name != PACKAGE_MARKER_FILE)
                .is_some_and(|name| glob.matched(&CandidatePath::from(name)).is_some())
        })
        .collect())
}

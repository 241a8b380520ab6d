//! Command helper utilities

use std::path::{Path, PathBuf};

use console::Style;

use crate::bindings::StagingReport;
use crate::cache::PackageCache;
use crate::cli::ConfigureArgs;
use crate::error::{Result, StagehandError};
use crate::pipeline::{BuildContext, Configured, Resolution};

/// Resolve project path from optional argument
///
/// If a project path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_project_path(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| StagehandError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}

/// Make a command-line registry path absolute against the working directory
fn absolute_registry(registry: Option<PathBuf>) -> Result<Option<PathBuf>> {
    match registry {
        Some(path) if path.is_relative() => Ok(Some(std::env::current_dir()?.join(path))),
        other => Ok(other),
    }
}

/// Load the build context for a configuring command
pub fn load_context(
    project: Option<PathBuf>,
    registry: Option<PathBuf>,
    configure: &ConfigureArgs,
) -> Result<BuildContext> {
    let project_root = resolve_project_path(project)?;
    let registry = absolute_registry(registry)?;
    BuildContext::load(&project_root, registry.as_deref(), PackageCache::from_env()?)?
        .with_settings(&configure.settings)?
        .with_options(&configure.options)
        .map(|ctx| ctx.show_progress(console::Term::stderr().is_term()))
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn print_resolution(resolution: &Resolution) {
    let count = resolution.installations.len();
    println!(
        "{} {} package{} ({} cached, {} prebuilt, {} built)",
        Style::new().green().bold().apply_to("Resolved"),
        count,
        if count == 1 { "" } else { "s" },
        resolution.cached,
        resolution.prebuilt,
        resolution.built
    );
    for installation in &resolution.installations {
        println!(
            "  {} {}",
            Style::new().cyan().apply_to(installation.reference()),
            Style::new().dim().apply_to(&installation.package_id)
        );
    }
}

pub fn print_configured(ctx: &BuildContext, configured: &Configured) {
    print_resolution(&configured.resolution);
    if configured.lockfile_updated {
        println!("{} stagehand.lock", Style::new().green().bold().apply_to("Updated"));
    }
    if !configured.generated.is_empty() {
        println!(
            "{} {} file{}",
            Style::new().green().bold().apply_to("Generated"),
            configured.generated.len(),
            if configured.generated.len() == 1 { "" } else { "s" }
        );
        for path in &configured.generated {
            println!("  {}", display_path(&ctx.project_root, path));
        }
    }
}

pub fn print_staging(project_root: &Path, report: &StagingReport) {
    if report.is_empty() {
        println!("No bindings to stage.");
        return;
    }

    let verb = if report.dry_run { "Would stage" } else { "Staged" };
    println!(
        "{} {} file{}",
        Style::new().green().bold().apply_to(verb),
        report.copies.len(),
        if report.copies.len() == 1 { "" } else { "s" }
    );
    for copy in &report.copies {
        let marker = if copy.overwrote {
            Style::new().yellow().apply_to(" (overwrite)").to_string()
        } else {
            String::new()
        };
        println!("  {}{marker}", display_path(project_root, &copy.destination));
    }

    let overwritten = report.overwrites().count();
    if overwritten > 0 {
        println!(
            "{} {overwritten} existing file{}",
            Style::new().yellow().apply_to("Replaced"),
            if overwritten == 1 { "" } else { "s" }
        );
    }
}

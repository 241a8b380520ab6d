//! BLAKE3 hashing utilities for package identity and integrity

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{Result, StagehandError};
use crate::settings::Settings;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Length of the hex package id kept in cache paths and lockfiles
const PACKAGE_ID_LEN: usize = 16;

/// Files excluded from content hashes
const EXCLUDED_FILES: &[&str] = &[crate::cache::PACKAGE_MARKER_FILE];

/// Inputs that identify one binary configuration of a package
#[derive(Debug, Clone)]
pub struct PackageIdInputs<'a> {
    pub name: &'a str,
    pub version: &'a str,
    /// `None` for header-only packages, whose binaries do not vary by platform
    pub settings: Option<&'a Settings>,
    pub options: &'a BTreeMap<String, String>,
    /// Package ids of direct requirements
    pub requires: &'a [String],
}

/// Compute the deterministic package id for a package configuration
///
/// Every field is written with a key and a null separator so that two
/// different configurations can never serialize to the same byte stream.
pub fn package_id(inputs: &PackageIdInputs<'_>) -> String {
    let mut hasher = Hasher::new();

    let mut field = |key: &str, value: &str| {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\0");
    };

    field("name", inputs.name);
    field("version", inputs.version);

    if let Some(settings) = inputs.settings {
        for (key, value) in settings.entries() {
            field(&format!("settings.{key}"), value);
        }
    }

    for (key, value) in inputs.options {
        field(&format!("options.{key}"), value.as_str());
    }

    let mut requires = inputs.requires.to_vec();
    requires.sort();
    for id in &requires {
        field("requires", id.as_str());
    }

    let hex = hasher.finalize().to_hex();
    hex[..PACKAGE_ID_LEN].to_string()
}

fn hash_reader(path: &Path, hasher: &mut Hasher) -> Result<()> {
    let file = File::open(path).map_err(|e| StagehandError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| StagehandError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Calculate BLAKE3 hash of a directory's contents
///
/// This hashes all files in the directory recursively, sorted by path
/// for deterministic results. Excludes the package marker file.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(StagehandError::FileReadFailed {
            path: path.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut hasher = Hasher::new();
    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !EXCLUDED_FILES.contains(&name.as_ref())
        })
        .collect();

    files.sort_by_key(|e| e.path().to_path_buf());

    for entry in files {
        let file_path = entry.path();

        let relative_path = file_path.strip_prefix(path).unwrap_or(file_path);
        hasher.update(crate::path_utils::to_forward_slashes(relative_path).as_bytes());
        hasher.update(b"\0");

        hash_reader(file_path, &mut hasher)?;

        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

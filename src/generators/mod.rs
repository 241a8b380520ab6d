//! Build-system integration generators
//!
//! ## Built-in Generators
//!
//! - **cmake-toolchain**: `stagehand_toolchain.cmake` with build type, prefix path and options
//! - **cmake-deps**: `<name>-config.cmake` and `<name>-config-version.cmake` per package
//! - **json**: `stagehand_graph.json`, the resolved graph
//!
//! ## Adding a Generator
//!
//! 1. Create a new file in `src/generators/`
//! 2. Implement `Generator` from `plugin.rs`
//! 3. Register it in `GeneratorRegistry::register_builtins()`

pub mod cmake_deps;
pub mod cmake_toolchain;
pub mod json;
pub mod plugin;

use std::path::{Path, PathBuf};

use crate::error::{Result, fs};
use crate::path_utils;

pub use plugin::{Generator, GeneratorContext, GeneratorRegistry};

/// First line of every generated CMake file
const CMAKE_HEADER: &str = "# Generated by stagehand. Do not edit.";

/// Write one generated file, creating the output folder
pub fn write_output(output_dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| fs::write_error(output_dir, &e))?;
    let path = output_dir.join(file_name);
    std::fs::write(&path, content).map_err(|e| fs::write_error(&path, &e))?;
    Ok(path)
}

/// Quote a value for a CMake string argument
fn cmake_quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{escaped}\"")
}

/// Quote a path for CMake, with forward slashes
fn cmake_path(path: &Path) -> String {
    cmake_quote(&path_utils::to_forward_slashes(path))
}

/// Upper-case identifier usable in a CMake variable name
fn cmake_ident(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

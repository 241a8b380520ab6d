//! `cmake-deps` generator
//!
//! One `find_package(<name> CONFIG)` entry point per installation, declaring
//! an imported `<name>::<name>` interface target that carries the package's
//! include dirs, link dirs, libraries, defines and requirements.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::cache::PackageInstallation;
use crate::error::{Result, fs};

use super::plugin::{Generator, GeneratorContext};
use super::{CMAKE_HEADER, cmake_path, cmake_quote, write_output};

#[derive(Debug, Default, Clone, Copy)]
pub struct CmakeDeps;

pub fn config_file_name(package: &str) -> String {
    format!("{package}-config.cmake")
}

pub fn version_file_name(package: &str) -> String {
    format!("{package}-config-version.cmake")
}

fn target_name(package: &str) -> String {
    format!("{package}::{package}")
}

fn render_config(inst: &PackageInstallation, out: &mut String) -> fmt::Result {
    let name = &inst.name;
    let dirs = |list: &[String]| -> String {
        list.iter()
            .map(|d| cmake_path(&inst.folder.join(d)))
            .collect::<Vec<_>>()
            .join(" ")
    };

    writeln!(out, "{CMAKE_HEADER}")?;
    writeln!(out, "# {name}/{} package id {}", inst.version, inst.package_id)?;
    writeln!(out)?;
    writeln!(out, "include_guard(GLOBAL)")?;
    writeln!(out)?;
    writeln!(out, "set({name}_VERSION {})", cmake_quote(&inst.version))?;
    writeln!(out, "set({name}_PACKAGE_FOLDER {})", cmake_path(&inst.folder))?;
    writeln!(out, "set({name}_INCLUDE_DIRS {})", dirs(&inst.layout.include_dirs))?;
    writeln!(out, "set({name}_LIB_DIRS {})", dirs(&inst.layout.lib_dirs))?;
    writeln!(
        out,
        "set({name}_DEFINITIONS {})",
        inst.layout
            .defines
            .iter()
            .map(|d| cmake_quote(d))
            .collect::<Vec<_>>()
            .join(" ")
    )?;

    if !inst.requires.is_empty() {
        writeln!(out)?;
        writeln!(out, "include(CMakeFindDependencyMacro)")?;
        for dep in &inst.requires {
            writeln!(out, "find_dependency({} CONFIG)", dep.name)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "set({name}_LIBRARIES)")?;
    for lib in &inst.layout.libs {
        let var = format!("{name}_{lib}_LIBRARY");
        writeln!(
            out,
            "find_library({var} NAMES {} PATHS ${{{name}_LIB_DIRS}} NO_DEFAULT_PATH)",
            cmake_quote(lib)
        )?;
        writeln!(out, "if({var})")?;
        writeln!(out, "  list(APPEND {name}_LIBRARIES ${{{var}}})")?;
        writeln!(out, "else()")?;
        writeln!(
            out,
            "  message(WARNING \"{name}: library '{lib}' not found in ${{{name}_LIB_DIRS}}\")"
        )?;
        writeln!(out, "endif()")?;
    }

    let target = target_name(name);
    writeln!(out)?;
    writeln!(out, "if(NOT TARGET {target})")?;
    writeln!(out, "  add_library({target} INTERFACE IMPORTED)")?;
    writeln!(out, "  set_target_properties({target} PROPERTIES")?;
    writeln!(out, "    INTERFACE_INCLUDE_DIRECTORIES \"${{{name}_INCLUDE_DIRS}}\"")?;
    writeln!(out, "    INTERFACE_LINK_DIRECTORIES \"${{{name}_LIB_DIRS}}\"")?;
    writeln!(out, "    INTERFACE_COMPILE_DEFINITIONS \"${{{name}_DEFINITIONS}}\")")?;
    writeln!(out, "  target_link_libraries({target} INTERFACE ${{{name}_LIBRARIES}})")?;
    for dep in &inst.requires {
        writeln!(out, "  target_link_libraries({target} INTERFACE {})", target_name(&dep.name))?;
    }
    writeln!(out, "endif()")?;
    writeln!(out)?;
    writeln!(out, "set({name}_FOUND TRUE)")?;
    Ok(())
}

fn render_version(inst: &PackageInstallation, out: &mut String) -> fmt::Result {
    writeln!(out, "{CMAKE_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "set(PACKAGE_VERSION {})", cmake_quote(&inst.version))?;
    writeln!(out)?;
    writeln!(out, "if(PACKAGE_FIND_VERSION VERSION_GREATER PACKAGE_VERSION)")?;
    writeln!(out, "  set(PACKAGE_VERSION_COMPATIBLE FALSE)")?;
    writeln!(out, "else()")?;
    writeln!(out, "  set(PACKAGE_VERSION_COMPATIBLE TRUE)")?;
    writeln!(out, "  if(PACKAGE_FIND_VERSION STREQUAL PACKAGE_VERSION)")?;
    writeln!(out, "    set(PACKAGE_VERSION_EXACT TRUE)")?;
    writeln!(out, "  endif()")?;
    writeln!(out, "endif()")?;
    Ok(())
}

impl Generator for CmakeDeps {
    fn name(&self) -> &str {
        "cmake-deps"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(ctx.installations.len() * 2);

        for inst in ctx.installations {
            let config_name = config_file_name(&inst.name);
            let mut config = String::new();
            render_config(inst, &mut config)
                .map_err(|e| fs::write_failed(config_name.as_str(), e.to_string()))?;
            written.push(write_output(ctx.output_dir, &config_name, &config)?);

            let version_name = version_file_name(&inst.name);
            let mut version = String::new();
            render_version(inst, &mut version)
                .map_err(|e| fs::write_failed(version_name.as_str(), e.to_string()))?;
            written.push(write_output(ctx.output_dir, &version_name, &version)?);
        }

        Ok(written)
    }
}

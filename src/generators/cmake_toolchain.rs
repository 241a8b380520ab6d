//! `cmake-toolchain` generator

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use crate::error::{Result, fs};

use super::plugin::{Generator, GeneratorContext};
use super::{CMAKE_HEADER, cmake_ident, cmake_path, cmake_quote, write_output};

pub const TOOLCHAIN_FILE: &str = "stagehand_toolchain.cmake";

#[derive(Debug, Default, Clone, Copy)]
pub struct CmakeToolchain;

impl CmakeToolchain {
    fn render(ctx: &GeneratorContext<'_>, out: &mut String) -> fmt::Result {
        writeln!(out, "{CMAKE_HEADER}")?;
        writeln!(out, "# Project: {}", ctx.project)?;
        writeln!(out)?;
        writeln!(out, "include_guard()")?;
        writeln!(out)?;

        writeln!(out, "if(NOT CMAKE_BUILD_TYPE AND NOT CMAKE_CONFIGURATION_TYPES)")?;
        writeln!(
            out,
            "  set(CMAKE_BUILD_TYPE {} CACHE STRING \"Build type\" FORCE)",
            cmake_quote(&ctx.settings.build_type)
        )?;
        writeln!(out, "endif()")?;
        writeln!(out)?;

        for (key, value) in ctx.settings.entries() {
            writeln!(out, "set(STAGEHAND_{} {})", cmake_ident(key), cmake_quote(value))?;
        }
        writeln!(out)?;

        // cmake-deps writes its config files next to this one
        writeln!(out, "list(PREPEND CMAKE_PREFIX_PATH {})", cmake_path(ctx.output_dir))?;
        writeln!(out, "list(PREPEND CMAKE_MODULE_PATH {})", cmake_path(ctx.output_dir))?;
        writeln!(out, "set(CMAKE_FIND_PACKAGE_PREFER_CONFIG ON)")?;

        for installation in ctx.installations {
            if installation.options.is_empty() {
                continue;
            }
            writeln!(out)?;
            writeln!(out, "# {}/{} options", installation.name, installation.version)?;
            for (key, value) in &installation.options {
                writeln!(
                    out,
                    "set(STAGEHAND_{}_{} {})",
                    cmake_ident(&installation.name),
                    cmake_ident(key),
                    cmake_quote(value.as_str())
                )?;
            }
        }

        Ok(())
    }
}

impl Generator for CmakeToolchain {
    fn name(&self) -> &str {
        "cmake-toolchain"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Vec<PathBuf>> {
        let mut content = String::new();
        Self::render(ctx, &mut content)
            .map_err(|e| fs::write_failed(TOOLCHAIN_FILE, e.to_string()))?;
        let path = write_output(ctx.output_dir, TOOLCHAIN_FILE, &content)?;
        Ok(vec![path])
    }
}

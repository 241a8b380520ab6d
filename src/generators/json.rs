//! `json` generator: the resolved graph for tools that do not speak CMake

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::OptionValue;
use crate::error::Result;
use crate::path_utils;
use crate::recipe::PackageLayout;
use crate::settings::Settings;

use super::plugin::{Generator, GeneratorContext};
use super::write_output;

pub const GRAPH_FILE: &str = "stagehand_graph.json";

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonGraph;

#[derive(Debug, Serialize)]
struct GraphDocument<'a> {
    project: &'a str,
    settings: &'a Settings,
    packages: Vec<PackageEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct PackageEntry<'a> {
    name: &'a str,
    version: &'a str,
    package_id: &'a str,
    folder: String,
    options: &'a BTreeMap<String, OptionValue>,
    requires: Vec<String>,
    layout: &'a PackageLayout,
    content_hash: &'a str,
}

impl Generator for JsonGraph {
    fn name(&self) -> &str {
        "json"
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<Vec<PathBuf>> {
        let document = GraphDocument {
            project: ctx.project,
            settings: ctx.settings,
            packages: ctx
                .installations
                .iter()
                .map(|inst| PackageEntry {
                    name: &inst.name,
                    version: &inst.version,
                    package_id: &inst.package_id,
                    folder: path_utils::to_forward_slashes(&inst.folder),
                    options: &inst.options,
                    requires: inst.requires.iter().map(ToString::to_string).collect(),
                    layout: &inst.layout,
                    content_hash: &inst.content_hash,
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&document)?;
        let path = write_output(ctx.output_dir, GRAPH_FILE, &format!("{json}\n"))?;
        Ok(vec![path])
    }
}

//! Graph command: plan only, nothing is materialized

use std::path::PathBuf;

use console::Style;

use crate::cli::GraphArgs;
use crate::error::Result;
use crate::generators::GeneratorRegistry;
use crate::resolver::ResolutionGraph;

use super::helpers;

pub fn run(project: Option<PathBuf>, registry: Option<PathBuf>, args: GraphArgs) -> Result<()> {
    let ctx = helpers::load_context(project, registry, &args.configure)?;
    let declaration = ctx.declare(&GeneratorRegistry::with_builtins()?)?;
    let graph = ctx.plan(&declaration)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&graph.summary())?);
    } else {
        print_graph(&graph);
    }
    Ok(())
}

fn print_graph(graph: &ResolutionGraph) {
    println!("{} {}", Style::new().bold().apply_to("Settings:"), graph.settings);
    if graph.is_empty() {
        println!("No packages required.");
        return;
    }

    println!("{}", Style::new().bold().apply_to("Packages:"));
    for package in &graph.packages {
        let marker = if package.direct { "" } else { " (transitive)" };
        println!(
            "  {} {}{}",
            Style::new().cyan().apply_to(&package.reference),
            Style::new().dim().apply_to(&package.package_id),
            marker
        );
        for (key, value) in &package.options {
            println!("      {key}={value}");
        }
        if !package.requires.is_empty() {
            let requires: Vec<String> = package.requires.iter().map(ToString::to_string).collect();
            println!("      requires: {}", requires.join(", "));
        }
    }
}

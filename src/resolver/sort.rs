//! Topological sort implementation using depth-first search (DFS)
//!
//! Orders packages so that every package comes after the packages it
//! requires.
//!
//! ## Algorithm
//!
//! Uses DFS with three-color marking to detect cycles and produce ordering:
//!
//! 1. **WHITE** (unvisited): Node hasn't been processed
//! 2. **GRAY** (on the current path): Node is in current recursion stack
//! 3. **BLACK** (permanently visited): Node has been fully processed
//!
//! Cycles are detected when we encounter a GRAY node.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, deps};

/// Context for topological sort operations
struct TopoSortContext<'a> {
    /// Dependency map (adjacency list)
    deps: &'a HashMap<String, Vec<String>>,
    /// Fully processed packages (BLACK)
    visited: HashSet<String>,
    /// Current DFS path (GRAY), in visit order for cycle reporting
    path: Vec<String>,
    /// Package names in dependency order
    result: Vec<String>,
}

/// Perform topological sort to get resolution order
///
/// Returns names in dependency order (requirements first, dependents last).
/// Top-level packages are visited in `declared` order; packages only reached
/// transitively are visited afterwards in alphabetical order.
///
/// # Errors
///
/// Returns `CircularDependency` naming the cycle, e.g. `a -> b -> a`.
///
/// # Example
///
/// ```text
/// Dependencies:
///   imgui requires glad
///   glad  requires khrplatform
///
/// Declared: [imgui]
///
/// Result: [khrplatform, glad, imgui]
/// ```
pub fn topological_sort(
    deps: &HashMap<String, Vec<String>>,
    declared: &[String],
) -> Result<Vec<String>> {
    let mut ctx = TopoSortContext {
        deps,
        visited: HashSet::new(),
        path: Vec::new(),
        result: Vec::new(),
    };

    for name in declared {
        topo_dfs(&mut ctx, name)?;
    }

    let mut remaining: Vec<&String> = deps
        .keys()
        .filter(|name| !ctx.visited.contains(name.as_str()))
        .collect();
    remaining.sort();
    for name in remaining {
        topo_dfs(&mut ctx, name)?;
    }

    Ok(ctx.result)
}

fn topo_dfs(ctx: &mut TopoSortContext<'_>, name: &str) -> Result<()> {
    if let Some(start) = ctx.path.iter().position(|n| n == name) {
        let mut chain: Vec<&str> = ctx.path[start..].iter().map(String::as_str).collect();
        chain.push(name);
        return Err(deps::circular(chain.join(" -> ")));
    }

    if ctx.visited.contains(name) {
        return Ok(());
    }

    ctx.path.push(name.to_string());

    if let Some(requires) = ctx.deps.get(name) {
        for dep in requires {
            topo_dfs(ctx, dep)?;
        }
    }

    ctx.path.pop();
    ctx.visited.insert(name.to_string());
    ctx.result.push(name.to_string());

    Ok(())
}

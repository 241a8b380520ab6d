//! Command implementations for the stagehand CLI

pub mod cache;
pub mod completions;
pub mod graph;
pub mod helpers;
pub mod install;
pub mod resolve;
pub mod stage;
pub mod version;

//! Cylc graph - dependency graph generation for cycling workflows
//!
//! Builds the cold-start, warm-start and final-cycle dependency directives
//! of a Cylc suite from a declarative per-task YAML specification, writes
//! them into the suite's graph template, and renders graph images with the
//! scheduler's own `graph` command.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod graph;
pub mod images;
pub mod logging;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::ToolConfig;
pub use graph::builder::{build_graph, GraphAccumulator, PhaseDirectives};
pub use graph::render::{render_directive, DEFAULT_INTERVAL_PLACEHOLDER};
pub use graph::resolver::{resolve, CycleOffset, Dependency, Phase};
pub use graph::spec::{DependencyAttrs, DependencyDecl, TaskSpec, TaskSpecs};
pub use graph::writer::write_graph;

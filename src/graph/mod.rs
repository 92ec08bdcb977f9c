//! Cycle graph generation
//!
//! This module loads task specifications, resolves per-phase dependencies,
//! renders graph directives and writes them into the suite's graph file.

pub mod builder;
pub mod render;
pub mod resolver;
pub mod spec;
pub mod template;
pub mod writer;

//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::graph::spec::{TaskSpec, TaskSpecs};

/// Minimal Cylc 7 graph template with one placeholder per section
pub const GRAPH_TEMPLATE: &str = "[scheduling]\n\
\tinitial cycle point = {{ INITIAL_CYCLE_POINT }}\n\
\tfinal cycle point = {{ FINAL_CYCLE_POINT }}\n\
\t[[dependencies]]\n\
\t\t[[[R1]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{COLD_START_TASKS}}\"\"\"\n\
\t\t[[[R/PT{{ CYCLE_INTERVAL }}S]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{WARM_START_TASKS}}\"\"\"\n\
\t\t[[[R1/$]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{FINAL_CYCLE_TASKS}}\"\"\"\n";

/// A small forecast workflow exercising every phase.
///
/// `prep` is cold-start only with no dependencies, so it never appears in
/// the output. `obs` takes part in no phase.
#[must_use]
pub fn sample_specs() -> TaskSpecs {
    [
        TaskSpec::new("prep").with_cold_start(),
        TaskSpec::new("forecast")
            .with_cold_start()
            .with_warm_start()
            .with_current("prep", None)
            .with_previous("forecast", None),
        TaskSpec::new("post")
            .with_cold_start()
            .with_warm_start()
            .with_final_cycle()
            .with_current("forecast", Some(false)),
        TaskSpec::new("verify")
            .with_warm_start()
            .with_final_cycle()
            .with_previous("forecast", Some(true))
            .with_current("obs", None),
        TaskSpec::new("obs"),
    ]
    .into_iter()
    .collect()
}

//! Phase orchestration
//!
//! Walks every task in declaration order and collects rendered directives
//! into one ordered collection per phase.

use serde::Serialize;
use tracing::{debug, info};

use crate::graph::render::render_directive;
use crate::graph::resolver::{resolve, Phase};
use crate::graph::spec::{TaskSpec, TaskSpecs};

/// Insertion-ordered mapping from task name to its directive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhaseDirectives {
    entries: Vec<(String, String)>,
}

impl PhaseDirectives {
    /// Store a directive; re-inserting a task replaces it in place
    pub fn insert(&mut self, task: &str, directive: String) {
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| name == task) {
            slot.1 = directive;
        } else {
            self.entries.push((task.to_string(), directive));
        }
    }

    /// Directive for `task`, if one was rendered
    #[must_use]
    pub fn get(&self, task: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == task)
            .map(|(_, directive)| directive.as_str())
    }

    /// `(task, directive)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(task, directive)| (task.as_str(), directive.as_str()))
    }

    /// Number of rendered directives
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no directive was rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rendered directives for all three phases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphAccumulator {
    /// Cold-start directives
    pub cold_start: PhaseDirectives,
    /// Warm-start directives
    pub warm_start: PhaseDirectives,
    /// Final-cycle directives
    pub final_cycle: PhaseDirectives,
}

impl GraphAccumulator {
    /// Directives collected for `phase`
    #[must_use]
    pub const fn phase(&self, phase: Phase) -> &PhaseDirectives {
        match phase {
            Phase::ColdStart => &self.cold_start,
            Phase::WarmStart => &self.warm_start,
            Phase::FinalCycle => &self.final_cycle,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseDirectives {
        match phase {
            Phase::ColdStart => &mut self.cold_start,
            Phase::WarmStart => &mut self.warm_start,
            Phase::FinalCycle => &mut self.final_cycle,
        }
    }

    /// Total directives across all phases
    #[must_use]
    pub fn total(&self) -> usize {
        Phase::ALL.iter().map(|&p| self.phase(p).len()).sum()
    }
}

/// Render the directive for one task in one phase.
///
/// Returns `None` when the task does not take part in the phase or has no
/// dependencies that phase requires.
#[must_use]
pub fn build_task_directive(
    task: &TaskSpec,
    phase: Phase,
    interval_placeholder: &str,
) -> Option<String> {
    if !phase.enabled_for(task) {
        return None;
    }
    let deps = resolve(task, phase);
    render_directive(&deps, &task.name, interval_placeholder)
}

/// Build the per-phase directive collections for every task.
#[must_use]
pub fn build_graph(specs: &TaskSpecs, interval_placeholder: &str) -> GraphAccumulator {
    let mut acc = GraphAccumulator::default();

    for task in &specs.tasks {
        debug!(task = %task.name, "collecting task attributes");
        for phase in Phase::ALL {
            match build_task_directive(task, phase, interval_placeholder) {
                Some(directive) => {
                    debug!(task = %task.name, %phase, %directive, "rendered");
                    acc.phase_mut(phase).insert(&task.name, directive);
                }
                None if phase.enabled_for(task) => {
                    debug!(task = %task.name, %phase, "no qualifying dependencies; skipped");
                }
                None => {}
            }
        }
    }

    info!(
        cold_start = acc.cold_start.len(),
        warm_start = acc.warm_start.len(),
        final_cycle = acc.final_cycle.len(),
        "graph built"
    );

    acc
}

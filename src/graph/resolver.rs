//! Dependency resolution
//!
//! Selects the upstream dependencies a task needs for one cycle phase and
//! classifies each as an ordinary task or a family.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::spec::{DependencyDecl, TaskSpec};

/// Cycle phase a graph section is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// First cycle; no previous-cycle state exists
    ColdStart,
    /// Any subsequent cycle
    WarmStart,
    /// The last cycle
    FinalCycle,
}

impl Phase {
    /// All phases in orchestration order
    pub const ALL: [Self; 3] = [Self::ColdStart, Self::WarmStart, Self::FinalCycle];

    /// Whether the task declares participation in this phase
    #[must_use]
    pub const fn enabled_for(self, task: &TaskSpec) -> bool {
        match self {
            Self::ColdStart => task.cold_start,
            Self::WarmStart => task.warm_start,
            Self::FinalCycle => task.final_cycle,
        }
    }

    /// Template section name the phase's directives are written to
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::ColdStart => "COLD_START_TASKS",
            Self::WarmStart => "WARM_START_TASKS",
            Self::FinalCycle => "FINAL_CYCLE_TASKS",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ColdStart => "cold-start",
            Self::WarmStart => "warm-start",
            Self::FinalCycle => "final-cycle",
        };
        f.write_str(label)
    }
}

/// Which cycle an upstream dependency is evaluated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOffset {
    /// Same cycle as the downstream task
    Current,
    /// One cycle interval earlier
    Previous,
}

/// A classified upstream dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Upstream task or family name
    pub name: String,
    /// Whether all family members must succeed
    pub family: bool,
    /// Cycle the dependency is evaluated in
    pub offset: CycleOffset,
}

/// Resolve the dependencies `task` needs in `phase`.
///
/// Cold start reads current-cycle dependencies only, final cycle reads
/// previous-cycle dependencies only, and warm start reads previous-cycle
/// dependencies followed by current-cycle ones. Absent lists contribute
/// nothing. The phase flag is not consulted here.
#[must_use]
pub fn resolve(task: &TaskSpec, phase: Phase) -> Vec<Dependency> {
    let previous = || classify(task.previous_cycle_dependencies.as_deref(), CycleOffset::Previous);
    let current = || classify(task.current_cycle_dependencies.as_deref(), CycleOffset::Current);

    match phase {
        Phase::ColdStart => current().collect(),
        Phase::WarmStart => previous().chain(current()).collect(),
        Phase::FinalCycle => previous().collect(),
    }
}

fn classify(
    decls: Option<&[DependencyDecl]>,
    offset: CycleOffset,
) -> impl Iterator<Item = Dependency> + '_ {
    decls.unwrap_or_default().iter().map(move |decl| Dependency {
        name: decl.name.clone(),
        family: decl.is_family(),
        offset,
    })
}

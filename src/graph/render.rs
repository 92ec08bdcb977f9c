//! Directive rendering
//!
//! Turns classified dependencies into one graph directive of the form
//! `a: succeed & b[-{{ CYCLE_INTERVAL }}]: succeed-all => task`.

use std::collections::HashSet;

use crate::graph::resolver::{CycleOffset, Dependency};

/// Default cycle-offset placeholder, resolved later by the suite's Jinja2 pass
pub const DEFAULT_INTERVAL_PLACEHOLDER: &str = "{{ CYCLE_INTERVAL }}";

/// Render a single dependency fragment, including its trailing space.
#[must_use]
pub fn render_fragment(dep: &Dependency, interval_placeholder: &str) -> String {
    let trigger = if dep.family { "succeed-all" } else { "succeed" };
    match dep.offset {
        CycleOffset::Current => format!("{}: {trigger} ", dep.name),
        CycleOffset::Previous => format!("{}[-{interval_placeholder}]: {trigger} ", dep.name),
    }
}

/// Render the directive for `task`.
///
/// Fragments keep first-seen order; a fragment identical to an earlier one
/// is dropped. Returns `None` when there are no dependencies so callers
/// never see a bare `=> task`.
#[must_use]
pub fn render_directive(
    deps: &[Dependency],
    task: &str,
    interval_placeholder: &str,
) -> Option<String> {
    if deps.is_empty() {
        return None;
    }

    let mut seen = HashSet::new();
    let fragments: Vec<String> = deps
        .iter()
        .map(|dep| render_fragment(dep, interval_placeholder))
        .filter(|fragment| seen.insert(fragment.clone()))
        .collect();

    Some(format!("{}=> {task}", fragments.join("& ")))
}

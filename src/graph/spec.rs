//! Task specification loader
//!
//! Parses the experiment YAML into an ordered list of [`TaskSpec`]s.
//! Conversion is permissive: missing or mistyped attributes fall back to
//! `false`/absent instead of failing the load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Attributes attached to an upstream dependency reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyAttrs {
    /// Whether the upstream reference names a family; `None` when not declared
    pub family: Option<bool>,
}

/// A single upstream dependency as declared in the task specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    /// Upstream task or family name
    pub name: String,
    /// Declared attributes; `None` when the entry had no attribute mapping
    pub attrs: Option<DependencyAttrs>,
}

impl DependencyDecl {
    /// Whether this dependency gates on a whole family.
    ///
    /// Absence of either the attribute mapping or the `family` key means
    /// an ordinary task.
    #[must_use]
    pub fn is_family(&self) -> bool {
        self.attrs
            .as_ref()
            .and_then(|attrs| attrs.family)
            .unwrap_or(false)
    }
}

/// Declaration-ordered dependency list for one cycle
pub type DependencyList = Vec<DependencyDecl>;

/// Per-task graph attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSpec {
    /// Unique task name
    pub name: String,
    /// Participates in the cold-start (first) cycle
    pub cold_start: bool,
    /// Participates in warm-start (subsequent) cycles
    pub warm_start: bool,
    /// Participates in the final cycle
    pub final_cycle: bool,
    /// Dependencies on tasks in the same cycle (`currcycle_tasks`)
    pub current_cycle_dependencies: Option<DependencyList>,
    /// Dependencies on tasks in the previous cycle (`prevcycle_tasks`)
    pub previous_cycle_dependencies: Option<DependencyList>,
}

impl TaskSpec {
    /// Create a task that participates in no phase and has no dependencies
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Mark the task as a cold-start task
    #[must_use]
    pub const fn with_cold_start(mut self) -> Self {
        self.cold_start = true;
        self
    }

    /// Mark the task as a warm-start task
    #[must_use]
    pub const fn with_warm_start(mut self) -> Self {
        self.warm_start = true;
        self
    }

    /// Mark the task as a final-cycle task
    #[must_use]
    pub const fn with_final_cycle(mut self) -> Self {
        self.final_cycle = true;
        self
    }

    /// Append a current-cycle dependency
    #[must_use]
    pub fn with_current(mut self, name: &str, family: Option<bool>) -> Self {
        self.current_cycle_dependencies
            .get_or_insert_with(Vec::new)
            .push(decl(name, family));
        self
    }

    /// Append a previous-cycle dependency
    #[must_use]
    pub fn with_previous(mut self, name: &str, family: Option<bool>) -> Self {
        self.previous_cycle_dependencies
            .get_or_insert_with(Vec::new)
            .push(decl(name, family));
        self
    }

    /// Convert one YAML task entry, defaulting anything absent or mistyped
    fn from_value(name: String, value: &Value) -> Self {
        let Some(attrs) = value.as_mapping() else {
            warn!(task = %name, "task attributes are not a mapping; task will not be graphed");
            return Self {
                name,
                ..Self::default()
            };
        };

        Self {
            cold_start: flag(&name, attrs, "cold_start"),
            warm_start: flag(&name, attrs, "warm_start"),
            final_cycle: flag(&name, attrs, "final_cycle"),
            current_cycle_dependencies: dependencies(&name, attrs, "currcycle_tasks"),
            previous_cycle_dependencies: dependencies(&name, attrs, "prevcycle_tasks"),
            name,
        }
    }
}

fn decl(name: &str, family: Option<bool>) -> DependencyDecl {
    DependencyDecl {
        name: name.to_string(),
        attrs: family.map(|family| DependencyAttrs {
            family: Some(family),
        }),
    }
}

/// Ordered collection of task specifications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSpecs {
    /// Tasks in document order
    pub tasks: Vec<TaskSpec>,
}

impl TaskSpecs {
    /// Parse a task specification YAML file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read task specification: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid task specification: {}", path.display()))
    }

    /// Parse task specification YAML content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let mut root: Value =
            serde_yaml::from_str(content).context("Failed to parse task specification YAML")?;
        root.apply_merge().context("Failed to resolve YAML merge keys")?;

        let mapping = match root {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => bail!("Task specification root must be a mapping of task names"),
        };

        let tasks = mapping
            .iter()
            .filter_map(|(key, value)| {
                let Some(name) = key_name(key) else {
                    warn!(?key, "skipping task with a non-scalar name");
                    return None;
                };
                Some(TaskSpec::from_value(name, value))
            })
            .collect();

        Ok(Self { tasks })
    }

    /// Find a task by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Number of tasks declared
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks were declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<TaskSpec> for TaskSpecs {
    fn from_iter<I: IntoIterator<Item = TaskSpec>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

/// Render a scalar YAML key as a task name
fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether `value` is a YAML 1.1 boolean spelling that YAML 1.2 reads as a string
#[must_use]
pub fn is_yaml11_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "no" | "on" | "off" | "y" | "n"
    )
}

/// Read a boolean attribute; anything but a real boolean is unset.
fn bool_attr(task: &str, key: &str, value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Null => None,
        Value::Bool(value) => Some(*value),
        Value::String(s) if is_yaml11_bool(s) => {
            warn!(
                task,
                key,
                value = %s,
                "YAML 1.1 boolean form is read as a string; use true/false. Treating as false"
            );
            None
        }
        other => {
            warn!(task, key, value = ?other, "expected a boolean; treating as false");
            None
        }
    }
}

fn flag(task: &str, attrs: &Mapping, key: &str) -> bool {
    bool_attr(task, key, attrs.get(key)).unwrap_or(false)
}

fn dependencies(task: &str, attrs: &Mapping, key: &str) -> Option<DependencyList> {
    let deps = match attrs.get(key)? {
        Value::Mapping(deps) => deps,
        Value::Null => return None,
        other => {
            warn!(task, key, value = ?other, "expected a mapping of dependencies; ignoring");
            return None;
        }
    };

    let list = deps
        .iter()
        .filter_map(|(dep, dep_attrs)| {
            let Some(name) = key_name(dep) else {
                warn!(task, key, ?dep, "skipping dependency with a non-scalar name");
                return None;
            };
            let attrs = match dep_attrs {
                Value::Mapping(m) => Some(DependencyAttrs {
                    family: bool_attr(task, "family", m.get("family")),
                }),
                Value::Null => None,
                other => {
                    warn!(
                        task,
                        key,
                        dependency = %name,
                        value = ?other,
                        "dependency attributes are not a mapping; ignoring"
                    );
                    None
                }
            };
            Some(DependencyDecl { name, attrs })
        })
        .collect();

    Some(list)
}

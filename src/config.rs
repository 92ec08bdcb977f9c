//! Tool configuration parser
//!
//! Parses the optional `graph.toml`. Every field has a default, so a
//! missing file or an empty table behaves like the stock configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::render::DEFAULT_INTERVAL_PLACEHOLDER;

/// Graph generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphSettings {
    /// Placeholder written into previous-cycle offsets, e.g. `a[-{{ CYCLE_INTERVAL }}]`
    pub interval_placeholder: String,
    /// File name written inside the output directory
    pub output_file: String,
    /// Whitespace emitted after each directive line in a graph section
    pub indent: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            interval_placeholder: DEFAULT_INTERVAL_PLACEHOLDER.to_string(),
            output_file: "graph.rc".to_string(),
            indent: "\t\t\t".to_string(),
        }
    }
}

/// External scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CylcSettings {
    /// Scheduler executable, looked up on `PATH` when not absolute
    pub executable: String,
}

impl Default for CylcSettings {
    fn default() -> Self {
        Self {
            executable: "cylc".to_string(),
        }
    }
}

/// Top-level configuration parsed from graph.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Graph generation settings
    pub graph: GraphSettings,
    /// Scheduler settings
    pub cylc: CylcSettings,
}

impl ToolConfig {
    /// Parse a graph.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_path)
    }

    /// Parse graph.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse graph.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.graph.interval_placeholder.trim().is_empty() {
            bail!("graph.interval_placeholder cannot be empty");
        }

        let output_file = &self.graph.output_file;
        if output_file.trim().is_empty() {
            bail!("graph.output_file cannot be empty");
        }
        if output_file.contains(['/', '\\']) || output_file == "." || output_file == ".." {
            bail!("graph.output_file '{output_file}' must be a bare file name");
        }

        if self.cylc.executable.trim().is_empty() {
            bail!("cylc.executable cannot be empty");
        }

        Ok(())
    }
}

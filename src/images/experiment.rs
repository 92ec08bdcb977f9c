//! Experiment attributes
//!
//! Reads the `{% set KEY = VALUE %}` declarations from a suite's
//! `experiment.rc` and plans the three graph images of a suite.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, TimeDelta};

/// Cycle point formats accepted in `experiment.rc`, most specific first
const CYCLE_POINT_FORMATS: [&str; 3] = ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M", "%Y-%m-%dT%H:%M:%S"];

/// Attributes needed to render suite graph images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentAttrs {
    /// Experiment name (`CYLCexptname`)
    pub name: String,
    /// Cycle interval in seconds (`CYCLE_INTERVAL`)
    pub cycle_interval_secs: i64,
    /// First cycle point (`INITIAL_CYCLE_POINT`)
    pub initial_cycle_point: String,
    /// Last cycle point (`FINAL_CYCLE_POINT`)
    pub final_cycle_point: String,
}

impl ExperimentAttrs {
    /// Read `<suite_path>/experiment.rc`
    pub fn from_suite(suite_path: &Path) -> Result<Self> {
        let path = suite_path.join("experiment.rc");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read experiment file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse experiment.rc content
    pub fn parse(content: &str) -> Result<Self> {
        let vars: HashMap<&str, &str> = content.lines().filter_map(parse_set_line).collect();

        let get = |key: &str| -> Result<String> {
            vars.get(key)
                .map(|value| unquote(value).to_string())
                .with_context(|| format!("Mandatory attribute {key} could not be determined"))
        };

        let interval = get("CYCLE_INTERVAL")?;
        let digits: String = interval
            .chars()
            .filter(|c| !matches!(c, 'P' | 'T' | 'S'))
            .collect();
        let cycle_interval_secs = digits
            .trim()
            .parse::<i64>()
            .with_context(|| format!("CYCLE_INTERVAL '{interval}' is not a duration in seconds"))?;

        Ok(Self {
            name: get("CYLCexptname")?,
            cycle_interval_secs,
            initial_cycle_point: get("INITIAL_CYCLE_POINT")?,
            final_cycle_point: get("FINAL_CYCLE_POINT")?,
        })
    }
}

/// Parse a `{% set KEY = VALUE %}` line into `(KEY, VALUE)`
fn parse_set_line(line: &str) -> Option<(&str, &str)> {
    let inner = line
        .trim()
        .strip_prefix("{%")?
        .strip_suffix("%}")?
        .trim()
        .strip_prefix("set")?;
    if !inner.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, value) = inner.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

/// Offset a cycle point by `secs`, keeping its original format
fn offset_cycle_point(point: &str, secs: i64) -> Result<String> {
    for format in CYCLE_POINT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(point, format) {
            let shifted = TimeDelta::try_seconds(secs)
                .and_then(|delta| parsed.checked_add_signed(delta))
                .with_context(|| format!("Cycle point {point} + {secs}s is out of range"))?;
            return Ok(shifted.format(format).to_string());
        }
    }
    bail!("Cycle point '{point}' is not in a recognised format")
}

/// Which slice of the workflow a graph image shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// First warm-start cycle
    Cycling,
    /// Cold-start cycle
    Initial,
    /// Last cycle
    Final,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cycling => "cycling",
            Self::Initial => "initial",
            Self::Final => "final",
        };
        f.write_str(label)
    }
}

/// One `cylc graph` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphImageJob {
    /// Experiment name, used for log file names
    pub experiment: String,
    /// Graph slice
    pub kind: GraphKind,
    /// Suite definition passed to `cylc graph`
    pub suite_file: PathBuf,
    /// First cycle point drawn
    pub start_point: String,
    /// Last cycle point drawn
    pub stop_point: String,
    /// PNG written by the scheduler
    pub output_file: PathBuf,
}

impl GraphImageJob {
    /// Arguments passed to the scheduler executable
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "graph".to_string(),
            self.suite_file.to_string_lossy().to_string(),
            self.start_point.clone(),
            self.stop_point.clone(),
            "--output-file".to_string(),
            self.output_file.to_string_lossy().to_string(),
        ]
    }
}

/// Plan the cycling, initial and final graph images, in that order.
pub fn plan_graph_images(
    attrs: &ExperimentAttrs,
    suite_path: &Path,
    output_path: &Path,
) -> Result<Vec<GraphImageJob>> {
    let cycling_stop = offset_cycle_point(&attrs.initial_cycle_point, attrs.cycle_interval_secs)?;

    let slices = [
        (GraphKind::Cycling, &attrs.initial_cycle_point, &cycling_stop),
        (GraphKind::Initial, &attrs.initial_cycle_point, &attrs.initial_cycle_point),
        (GraphKind::Final, &attrs.final_cycle_point, &attrs.final_cycle_point),
    ];

    Ok(slices
        .into_iter()
        .map(|(kind, start, stop)| GraphImageJob {
            experiment: attrs.name.clone(),
            kind,
            suite_file: suite_path.join("suite.rc"),
            start_point: start.clone(),
            stop_point: stop.clone(),
            output_file: output_path.join(format!("{}.graph.{kind}.png", attrs.name)),
        })
        .collect())
}

//! Graph file writer
//!
//! Serializes the per-phase directives into named sections and substitutes
//! them into the suite's graph template.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::GraphSettings;
use crate::graph::builder::GraphAccumulator;
use crate::graph::resolver::Phase;
use crate::graph::template::expand_template;

/// Section write order in the generated file
pub const SECTION_ORDER: [Phase; 3] = [Phase::ColdStart, Phase::FinalCycle, Phase::WarmStart];

/// Render each phase into its named section text.
///
/// Every directive is followed by a newline and `indent`, so the lines line
/// up under the template's `graph = """` block. Empty phases produce an
/// empty section.
#[must_use]
pub fn render_sections(acc: &GraphAccumulator, indent: &str) -> Vec<(&'static str, String)> {
    SECTION_ORDER
        .iter()
        .map(|&phase| {
            let text = acc
                .phase(phase)
                .iter()
                .fold(String::new(), |mut text, (_, directive)| {
                    text.push_str(directive);
                    text.push('\n');
                    text.push_str(indent);
                    text
                });
            (phase.section(), text)
        })
        .collect()
}

/// Substitute rendered sections into `template`.
#[must_use]
pub fn render_graph_file(acc: &GraphAccumulator, template: &str, indent: &str) -> String {
    let vars: HashMap<String, String> = render_sections(acc, indent)
        .into_iter()
        .map(|(name, text)| (name.to_string(), text))
        .collect();
    expand_template(template, &vars)
}

/// Write the graph file for `acc` into `output_dir`.
///
/// Reads `template_path`, creates `output_dir` if needed and returns the
/// path of the written file.
pub fn write_graph(
    acc: &GraphAccumulator,
    template_path: &Path,
    output_dir: &Path,
    settings: &GraphSettings,
) -> Result<PathBuf> {
    let template = fs::read_to_string(template_path).with_context(|| {
        format!(
            "Failed to read graph template: {}",
            template_path.display()
        )
    })?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let output_path = output_dir.join(&settings.output_file);
    info!(path = %output_path.display(), "writing Cylc workflow engine graph");

    let content = render_graph_file(acc, &template, &settings.indent);
    fs::write(&output_path, content)
        .with_context(|| format!("Failed to write graph file: {}", output_path.display()))?;

    Ok(output_path)
}

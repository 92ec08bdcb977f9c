//! CLI display for graph generation
//!
//! Summaries go to stderr so stdout stays clean for piping; the plain
//! directive listing used by `show` goes to stdout.

use std::path::Path;

use colored::Colorize;

use crate::graph::builder::GraphAccumulator;
use crate::graph::writer::SECTION_ORDER;
use crate::images::executor::ImageLogs;

/// Display handler for one generation run
pub struct GraphDisplay {
    source: String,
}

impl GraphDisplay {
    /// Create a display for the task specification at `source`
    #[must_use]
    pub fn new(source: &Path) -> Self {
        Self {
            source: source.display().to_string(),
        }
    }

    /// Print the run header
    pub fn print_header(&self) {
        eprintln!(
            "\n{} {}",
            "===".bold().cyan(),
            format!("Graph: {}", self.source).bold().cyan()
        );
        eprintln!("{}", "─".repeat(50).dimmed());
    }

    /// Print per-phase counts and where the graph was written
    pub fn print_summary(&self, acc: &GraphAccumulator, written: Option<&Path>) {
        for line in summary_lines(acc) {
            eprintln!("  {line}");
        }
        eprintln!("{}", "─".repeat(50).dimmed());

        let status = if acc.total() == 0 {
            "EMPTY".yellow().bold().to_string()
        } else {
            "COMPLETED".green().bold().to_string()
        };
        match written {
            Some(path) => eprintln!("  {status} {}", path.display().to_string().bold()),
            None => eprintln!("  {status} {}", self.source.bold()),
        }
        eprintln!();
    }
}

/// One `SECTION  n task(s)` line per phase, in write order
#[must_use]
pub fn summary_lines(acc: &GraphAccumulator) -> Vec<String> {
    SECTION_ORDER
        .iter()
        .map(|&phase| {
            let count = acc.phase(phase).len();
            let marker = if count == 0 {
                "·".dimmed().to_string()
            } else {
                "▶".blue().to_string()
            };
            format!("{marker} {:<18} {count} task(s)", phase.section())
        })
        .collect()
}

/// Render all directives grouped by section, for `show`
#[must_use]
pub fn render_directive_listing(acc: &GraphAccumulator) -> String {
    let mut out = String::new();
    for phase in SECTION_ORDER {
        out.push_str(&format!("[{}]\n", phase.section()));
        for (_, directive) in acc.phase(phase).iter() {
            out.push_str(directive);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Print the log files written for rendered graph images
pub fn print_image_logs(logs: &[ImageLogs]) {
    for log in logs {
        eprintln!(
            "  {} {} {}",
            "✓".green().bold(),
            log.out_log.display(),
            log.err_log.display().to_string().dimmed()
        );
    }
}

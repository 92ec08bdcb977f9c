//! Cylc graph - dependency graph generation for cycling workflows
//!
//! CLI entry point.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cylc_graph::cli::display::print_image_logs;
use cylc_graph::cli::{render_directive_listing, GraphDisplay};
use cylc_graph::config::ToolConfig;
use cylc_graph::graph::builder::{build_graph, GraphAccumulator};
use cylc_graph::graph::spec::TaskSpecs;
use cylc_graph::graph::writer::write_graph;
use cylc_graph::images::executor::render_graph_images;
use cylc_graph::images::experiment::{plan_graph_images, ExperimentAttrs};
use cylc_graph::logging::init_tracing;

/// Dependency graph generator for Cylc cycling workflows
///
/// Derives cold-start, warm-start and final-cycle graph directives from a
/// per-task YAML specification and writes them into a suite graph file.
#[derive(Parser, Debug)]
#[command(name = "cylc-graph", version, about)]
struct Cli {
    /// Path to an optional graph.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the graph and write it into the suite graph file
    Workflow {
        /// Task specification YAML
        #[arg(long)]
        yaml_file: PathBuf,

        /// Graph template with {{COLD_START_TASKS}}-style placeholders
        #[arg(long)]
        graph_template: PathBuf,

        /// Directory the graph file is written to
        #[arg(long)]
        output_path: PathBuf,
    },
    /// Print the generated directives without writing any file
    Show {
        /// Task specification YAML
        #[arg(long)]
        yaml_file: PathBuf,

        /// Emit JSON instead of the sectioned text listing
        #[arg(long)]
        json: bool,
    },
    /// Render cycling, initial and final graph images with `cylc graph`
    Images {
        /// Suite directory containing suite.rc and experiment.rc
        #[arg(long)]
        suite_path: PathBuf,

        /// Directory the PNG images are written to
        #[arg(long)]
        output_path: PathBuf,

        /// Directory for the scheduler's stdout/stderr logs
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,
    },
}

/// Load task specifications and build the graph.
fn load_and_build(yaml_file: &Path, config: &ToolConfig) -> Result<GraphAccumulator> {
    info!(path = %yaml_file.display(), "reading task specification");
    let specs = TaskSpecs::from_path(yaml_file)?;
    Ok(build_graph(&specs, &config.graph.interval_placeholder))
}

async fn run(cli: Cli) -> Result<()> {
    let config = ToolConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Workflow {
            yaml_file,
            graph_template,
            output_path,
        } => {
            let display = GraphDisplay::new(&yaml_file);
            display.print_header();
            let acc = load_and_build(&yaml_file, &config)?;
            let written = write_graph(&acc, &graph_template, &output_path, &config.graph)?;
            display.print_summary(&acc, Some(&written));
        }
        Command::Show { yaml_file, json } => {
            let acc = load_and_build(&yaml_file, &config)?;
            if json {
                let text =
                    serde_json::to_string_pretty(&acc).context("Failed to serialize graph")?;
                println!("{text}");
            } else {
                print!("{}", render_directive_listing(&acc));
            }
        }
        Command::Images {
            suite_path,
            output_path,
            log_dir,
        } => {
            let attrs = ExperimentAttrs::from_suite(&suite_path)?;
            let jobs = plan_graph_images(&attrs, &suite_path, &output_path)?;
            let logs = render_graph_images(&jobs, &config.cylc.executable, &log_dir).await?;
            print_image_logs(&logs);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let start = Instant::now();
    info!("beginning {}", env!("CARGO_PKG_NAME"));

    run(cli).await?;

    info!(
        elapsed_secs = start.elapsed().as_secs_f64(),
        "completed {}",
        env!("CARGO_PKG_NAME")
    );
    Ok(())
}

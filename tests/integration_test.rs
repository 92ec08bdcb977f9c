#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cylc_graph::config::ToolConfig;
use cylc_graph::graph::builder::build_graph;
use cylc_graph::graph::spec::TaskSpecs;
use cylc_graph::graph::writer::write_graph;
use cylc_graph::images::executor::render_graph_images;
use cylc_graph::images::experiment::{plan_graph_images, ExperimentAttrs};

const TASKS_YAML: &str = r"
prep_obs:
  cold_start: true
  warm_start: true
  prevcycle_tasks:
    forecast:
      family: true

analysis:
  cold_start: true
  warm_start: true
  currcycle_tasks:
    prep_obs:
  prevcycle_tasks:
    forecast:
      family: true

forecast:
  cold_start: true
  warm_start: true
  final_cycle: true
  currcycle_tasks:
    analysis:
    prep_obs:
  prevcycle_tasks:
    archive:

archive:
  warm_start: true
  final_cycle: true
  currcycle_tasks:
    forecast:
      family: true

notify:
  final_cycle: true
  currcycle_tasks:
    archive:
";

const GRAPH_TEMPLATE: &str = "[scheduling]\n\
\tinitial cycle point = {{ INITIAL_CYCLE_POINT }}\n\
\t[[dependencies]]\n\
\t\t[[[R1]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{COLD_START_TASKS}}\"\"\"\n\
\t\t[[[PT{{ CYCLE_INTERVAL }}S]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{WARM_START_TASKS}}\"\"\"\n\
\t\t[[[R1/$]]]\n\
\t\t\tgraph = \"\"\"\n\
\t\t\t{{FINAL_CYCLE_TASKS}}\"\"\"\n";

const I: &str = "{{ CYCLE_INTERVAL }}";

/// Integration test: task YAML → per-phase directives.
#[test]
fn test_yaml_to_directives() {
    let specs = TaskSpecs::parse(TASKS_YAML).unwrap();
    let acc = build_graph(&specs, I);

    // Cold start: only current-cycle dependencies; prep_obs has none
    let cold: Vec<(&str, &str)> = acc.cold_start.iter().collect();
    assert_eq!(
        cold,
        vec![
            ("analysis", "prep_obs: succeed => analysis"),
            (
                "forecast",
                "analysis: succeed & prep_obs: succeed => forecast"
            ),
        ]
    );

    // Warm start: previous-cycle fragments first, then current-cycle
    assert_eq!(
        acc.warm_start.get("prep_obs"),
        Some(format!("forecast[-{I}]: succeed-all => prep_obs").as_str())
    );
    assert_eq!(
        acc.warm_start.get("analysis"),
        Some(format!("forecast[-{I}]: succeed-all & prep_obs: succeed => analysis").as_str())
    );
    assert_eq!(
        acc.warm_start.get("forecast"),
        Some(
            format!("archive[-{I}]: succeed & analysis: succeed & prep_obs: succeed => forecast")
                .as_str()
        )
    );
    assert_eq!(
        acc.warm_start.get("archive"),
        Some("forecast: succeed-all => archive")
    );

    // Final cycle: previous-cycle only; archive and notify have none
    let final_tasks: Vec<&str> = acc.final_cycle.iter().map(|(t, _)| t).collect();
    assert_eq!(final_tasks, vec!["forecast"]);
    assert_eq!(
        acc.final_cycle.get("forecast"),
        Some(format!("archive[-{I}]: succeed => forecast").as_str())
    );
}

/// Integration test: full workflow run writes a deterministic graph file.
#[test]
fn test_workflow_writes_graph_file() {
    let dir = TempDir::new().unwrap();
    let yaml_path = dir.path().join("tasks.yaml");
    let template_path = dir.path().join("graph.tmpl");
    fs::write(&yaml_path, TASKS_YAML).unwrap();
    fs::write(&template_path, GRAPH_TEMPLATE).unwrap();

    let config = ToolConfig::default();
    let specs = TaskSpecs::from_path(&yaml_path).unwrap();
    let acc = build_graph(&specs, &config.graph.interval_placeholder);

    let output_dir = dir.path().join("expt").join("cylc");
    let written = write_graph(&acc, &template_path, &output_dir, &config.graph).unwrap();
    let first = fs::read_to_string(&written).unwrap();

    assert!(first.contains(
        "graph = \"\"\"\n\t\t\tprep_obs: succeed => analysis\n\t\t\tanalysis: succeed & prep_obs: succeed => forecast\n\t\t\t\"\"\""
    ));
    assert!(first.contains("[[[PT{{ CYCLE_INTERVAL }}S]]]"));
    assert!(first.contains("forecast[-{{ CYCLE_INTERVAL }}]: succeed-all => prep_obs"));
    assert!(!first.contains("{{COLD_START_TASKS}}"));

    // Regenerating from the same input produces byte-identical output
    let again = build_graph(&TaskSpecs::from_path(&yaml_path).unwrap(), I);
    let rewritten = write_graph(&again, &template_path, &output_dir, &config.graph).unwrap();
    assert_eq!(fs::read_to_string(rewritten).unwrap(), first);
}

/// Integration test: a custom placeholder and output file from graph.toml.
#[test]
fn test_config_overrides_placeholder_and_output_file() {
    let dir = TempDir::new().unwrap();
    let template_path = dir.path().join("graph.tmpl");
    fs::write(&template_path, "{{FINAL_CYCLE_TASKS}}").unwrap();

    let config = ToolConfig::parse(
        r#"
[graph]
interval_placeholder = "PT6H"
output_file = "dependencies.rc"
indent = ""
"#,
    )
    .unwrap();

    let specs = TaskSpecs::parse(TASKS_YAML).unwrap();
    let acc = build_graph(&specs, &config.graph.interval_placeholder);
    let written = write_graph(&acc, &template_path, dir.path(), &config.graph).unwrap();

    assert!(written.ends_with("dependencies.rc"));
    assert_eq!(
        fs::read_to_string(written).unwrap(),
        "archive[-PT6H]: succeed => forecast\n"
    );
}

/// Integration test: experiment.rc → planned images → rendered via a stand-in executable.
#[tokio::test]
async fn test_graph_images_end_to_end() {
    let dir = TempDir::new().unwrap();
    let suite = dir.path().join("suite");
    fs::create_dir_all(&suite).unwrap();
    fs::write(
        suite.join("experiment.rc"),
        "#!Jinja2\n\
         {% set CYLCexptname = \"demo\" %}\n\
         {% set INITIAL_CYCLE_POINT = \"20230101T000000\" %}\n\
         {% set FINAL_CYCLE_POINT = \"20230102T000000\" %}\n\
         {% set CYCLE_INTERVAL = \"PT43200S\" %}\n",
    )
    .unwrap();

    let attrs = ExperimentAttrs::from_suite(&suite).unwrap();
    let jobs = plan_graph_images(&attrs, &suite, Path::new("/png")).unwrap();
    assert_eq!(jobs[0].stop_point, "20230101T120000");

    let log_dir = dir.path().join("logs");
    let logs = render_graph_images(&jobs, "echo", &log_dir).await.unwrap();
    assert_eq!(logs.len(), 3);

    let cycling = fs::read_to_string(log_dir.join("out.demo.graph.cycling.log")).unwrap();
    assert!(cycling.ends_with(
        "20230101T000000 20230101T120000 --output-file /png/demo.graph.cycling.png\n"
    ));
    assert!(log_dir.join("err.demo.graph.final.log").exists());
}

/// Integration test: tasks sharing defaults through YAML anchors and merge keys.
#[test]
fn test_merged_defaults_reach_the_graph() {
    let yaml = r"
defaults: &cycled
  cold_start: true
  warm_start: true
forecast:
  <<: *cycled
  currcycle_tasks:
    prep:
";
    let acc = build_graph(&TaskSpecs::parse(yaml).unwrap(), I);
    assert_eq!(acc.cold_start.get("forecast"), Some("prep: succeed => forecast"));
    assert_eq!(acc.warm_start.get("forecast"), Some("prep: succeed => forecast"));
}

/// Integration test: malformed entries are tolerated, never fatal.
#[test]
fn test_permissive_spec_never_fails_build() {
    let yaml = r"
broken: 42
half:
  cold_start: true
  currcycle_tasks: not-a-mapping
ok:
  cold_start: true
  currcycle_tasks:
    half:
      family: maybe
";
    let specs = TaskSpecs::parse(yaml).unwrap();
    let acc = build_graph(&specs, I);
    assert_eq!(acc.total(), 1);
    assert_eq!(acc.cold_start.get("ok"), Some("half: succeed => ok"));
}

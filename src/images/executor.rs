//! Graph image executor
//!
//! Runs `cylc graph` for each planned image as a subprocess, capturing
//! stdout and stderr into per-image log files.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::images::experiment::GraphImageJob;

/// Result of one finished subprocess
#[derive(Debug)]
pub struct CommandOutput {
    /// Raw stdout bytes
    pub stdout: Vec<u8>,
    /// Raw stderr bytes
    pub stderr: Vec<u8>,
    /// Process exit code (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Wall-clock duration in seconds
    pub duration_secs: u64,
}

impl CommandOutput {
    /// Whether the process exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// Stdout for display, with invalid UTF-8 replaced
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr for display, with invalid UTF-8 replaced
    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Log files written for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLogs {
    /// Captured stdout
    pub out_log: PathBuf,
    /// Captured stderr
    pub err_log: PathBuf,
}

impl ImageLogs {
    /// `out.<expt>.graph.<kind>.log` / `err.<expt>.graph.<kind>.log` in `log_dir`
    #[must_use]
    pub fn for_job(job: &GraphImageJob, log_dir: &Path) -> Self {
        let stem = format!("{}.graph.{}.log", job.experiment, job.kind);
        Self {
            out_log: log_dir.join(format!("out.{stem}")),
            err_log: log_dir.join(format!("err.{stem}")),
        }
    }
}

/// Render every job in order, stopping at the first failure.
pub async fn render_graph_images(
    jobs: &[GraphImageJob],
    executable: &str,
    log_dir: &Path,
) -> Result<Vec<ImageLogs>> {
    tokio::fs::create_dir_all(log_dir)
        .await
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let mut written = Vec::with_capacity(jobs.len());
    for job in jobs {
        written.push(render_graph_image(job, executable, log_dir).await?);
    }
    Ok(written)
}

/// Render one graph image and write its logs.
pub async fn render_graph_image(
    job: &GraphImageJob,
    executable: &str,
    log_dir: &Path,
) -> Result<ImageLogs> {
    info!(
        kind = %job.kind,
        output = %job.output_file.display(),
        "creating graph image"
    );

    let mut cmd = std::process::Command::new(executable);
    cmd.args(job.args());

    let output = run_command(cmd)
        .await
        .with_context(|| format!("Cylc graph application for type {} failed", job.kind))?;

    let logs = ImageLogs::for_job(job, log_dir);
    tokio::fs::write(&logs.out_log, &output.stdout)
        .await
        .with_context(|| format!("Failed to write {}", logs.out_log.display()))?;
    tokio::fs::write(&logs.err_log, &output.stderr)
        .await
        .with_context(|| format!("Failed to write {}", logs.err_log.display()))?;

    if !output.success() {
        bail!(
            "Cylc graph application for type {} exited with code {}; see {}",
            job.kind,
            output
                .exit_code
                .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            logs.err_log.display()
        );
    }

    debug!(kind = %job.kind, duration_secs = output.duration_secs, "graph image created");
    Ok(logs)
}

/// Run a command, capturing stdout and stderr concurrently.
pub async fn run_command(cmd: std::process::Command) -> Result<CommandOutput> {
    let program = cmd.get_program().to_string_lossy().to_string();
    let mut tokio_cmd = TokioCommand::from(cmd);
    tokio_cmd.stdin(Stdio::null());
    tokio_cmd.stdout(Stdio::piped());
    tokio_cmd.stderr(Stdio::piped());

    let start = Instant::now();

    let mut child = tokio_cmd
        .spawn()
        .with_context(|| format!("Failed to spawn '{program}'"))?;

    // Take ownership of stdout/stderr handles
    let child_stdout = child.stdout.take().context("Failed to capture stdout")?;
    let child_stderr = child.stderr.take().context("Failed to capture stderr")?;

    let stdout_handle = tokio::spawn(capture(child_stdout));
    let stderr_handle = tokio::spawn(capture(child_stderr));

    let status = child.wait().await.context("Failed waiting for process")?;
    let stdout = stdout_handle
        .await
        .context("stdout reader panicked")?
        .context("Failed to read stdout")?;
    let stderr = stderr_handle
        .await
        .context("stderr reader panicked")?
        .context("Failed to read stderr")?;

    Ok(CommandOutput {
        stdout,
        stderr,
        exit_code: status.code(),
        duration_secs: start.elapsed().as_secs(),
    })
}

/// Drain a pipe to EOF, keeping the bytes as written.
async fn capture<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    reader.read_to_end(&mut captured).await?;
    Ok(captured)
}

//! Workflow-run lookup and watching over the `gh` CLI.

use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use dockhand_core::ToolCommand;

use crate::config::PagesConfig;
use crate::error::{PagesError, Result};

/// Identifier of a workflow run, as reported by the CI tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of `gh run list --json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub database_id: u64,
    #[serde(default)]
    pub head_sha: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

async fn list_runs(
    repo_dir: &Path,
    workflow: &str,
    limit: u32,
    fields: &str,
) -> Option<Vec<WorkflowRun>> {
    let output = ToolCommand::new("gh")
        .current_dir(repo_dir)
        .args([
            "run".to_string(),
            "list".to_string(),
            format!("--workflow={workflow}"),
            format!("--limit={limit}"),
            "--json".to_string(),
            fields.to_string(),
        ])
        .run()
        .await;

    let output = match output {
        Ok(o) if o.success() => o,
        Ok(o) => {
            warn!(workflow, exit_code = o.exit_code, stderr = %o.stderr.trim(), "run listing failed");
            return None;
        }
        Err(e) => {
            warn!(workflow, error = %e, "run listing could not be executed");
            return None;
        }
    };

    match serde_json::from_str::<Vec<WorkflowRun>>(&output.stdout) {
        Ok(runs) => Some(runs),
        Err(e) => {
            warn!(workflow, error = %e, "run listing returned unparseable JSON");
            None
        }
    }
}

fn run_matching_sha(runs: &[WorkflowRun], sha: &str) -> Option<RunId> {
    runs.iter()
        .find(|run| run.head_sha.as_deref() == Some(sha))
        .map(|run| RunId(run.database_id))
}

/// Most recent run of `workflow`, if the CI tool can name one.
///
/// Every failure mode collapses into `None`: no runs yet, output that does
/// not parse, and the listing command itself failing. Callers treat `None`
/// as "nothing to watch"; the distinction is only visible in the logs.
pub async fn latest_run_id(repo_dir: &Path, workflow: &str) -> Option<RunId> {
    let runs = list_runs(repo_dir, workflow, 1, "databaseId").await?;
    runs.first().map(|run| RunId(run.database_id))
}

/// Run of `workflow` whose head commit is `sha`, if one is registered.
///
/// The trigger path pushes a fresh commit and then looks its run up by
/// SHA, so a run started for somebody else's push is never picked up.
pub async fn run_id_for_sha(repo_dir: &Path, workflow: &str, sha: &str) -> Option<RunId> {
    let runs = list_runs(repo_dir, workflow, 10, "databaseId,headSha").await?;
    run_matching_sha(&runs, sha)
}

/// Wait for the run triggered by `sha` to register with the CI service.
///
/// A pushed commit takes a moment to show up in the run listing. Polls
/// with a doubling interval (capped at `registration_poll_cap`) until the
/// correlated run appears or `registration_timeout` elapses; the timeout
/// is its own error kind, distinct from a tool failure.
pub async fn await_run_registered(
    repo_dir: &Path,
    workflow: &str,
    sha: &str,
    config: &PagesConfig,
) -> Result<RunId> {
    let deadline = Instant::now() + config.registration_timeout;
    let mut interval = config.registration_poll_start;

    loop {
        if let Some(id) = run_id_for_sha(repo_dir, workflow, sha).await {
            debug!(%id, sha, "run registered");
            return Ok(id);
        }
        if Instant::now() + interval > deadline {
            return Err(PagesError::RegistrationTimeout {
                workflow: workflow.to_string(),
                sha: sha.to_string(),
                secs: config.registration_timeout.as_secs(),
            });
        }
        debug!(sha, wait_ms = interval.as_millis() as u64, "run not registered yet");
        tokio::time::sleep(interval).await;
        interval = (interval * 2).min(config.registration_poll_cap);
    }
}

/// Watch a run until it reaches a terminal state.
///
/// Delegates the waiting to `gh run watch`, which blocks until the run
/// completes. The terminal outcome is not distinguished here; a non-zero
/// exit propagates as a command failure, and a watch that outlives
/// `watch_timeout` is killed and reported as a timeout.
pub async fn watch_run(repo_dir: &Path, id: RunId, config: &PagesConfig) -> Result<()> {
    ToolCommand::new("gh")
        .current_dir(repo_dir)
        .args(["run", "watch"])
        .arg(id.to_string())
        .timeout(config.watch_timeout)
        .run_checked()
        .await?;
    Ok(())
}

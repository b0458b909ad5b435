//! Workflow trigger: push an empty commit and watch the run it starts.

use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use dockhand_core::git;

use crate::config::PagesConfig;
use crate::error::Result;
use crate::runs::{self, RunId};

/// Commit message for a rebuild trigger at the given local time.
fn trigger_message(now: DateTime<Local>) -> String {
    format!("trigger: rebuild pages {}", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Push an empty commit to set off the pages workflow, then wait for the
/// resulting run to finish.
///
/// The pushed HEAD SHA is the correlation token: the run lookup filters by
/// it, so a concurrent run for somebody else's push cannot be watched by
/// mistake. Returns the id of the completed run.
pub async fn trigger_workflow(repo_dir: &Path, config: &PagesConfig) -> Result<RunId> {
    git::commit_empty(repo_dir, &trigger_message(Local::now())).await?;
    git::push(repo_dir).await?;
    let sha = git::head_sha(repo_dir).await?;
    info!(sha, "trigger pushed");

    let id = runs::await_run_registered(repo_dir, &config.workflow, &sha, config).await?;
    info!(%id, "run registered, watching");
    runs::watch_run(repo_dir, id, config).await?;
    Ok(id)
}

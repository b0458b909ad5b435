//! Git collaborator: thin wrappers over the `git` CLI.
//!
//! Every operation names the repository directory explicitly. Remote
//! operations run with `GIT_TERMINAL_PROMPT=0` so a credential prompt fails
//! the command instead of stalling an unattended batch.

use std::path::Path;

use crate::error::{Result, ToolError};
use crate::exec::ToolCommand;

fn git_in(repo_dir: &Path) -> ToolCommand {
    ToolCommand::new("git")
        .current_dir(repo_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
}

/// Clone `url` into `target`. The target directory must not exist yet.
pub async fn clone(url: &str, target: &Path) -> Result<()> {
    ToolCommand::new("git")
        .env("GIT_TERMINAL_PROMPT", "0")
        .args(["clone", url])
        .arg(target.to_string_lossy())
        .run_checked()
        .await?;
    Ok(())
}

/// Update an existing clone from its default remote.
pub async fn pull(repo_dir: &Path) -> Result<()> {
    git_in(repo_dir).arg("pull").run_checked().await?;
    Ok(())
}

/// Record an empty commit carrying `message`.
pub async fn commit_empty(repo_dir: &Path, message: &str) -> Result<()> {
    git_in(repo_dir)
        .args(["commit", "--allow-empty", "-m"])
        .arg(message)
        .run_checked()
        .await?;
    Ok(())
}

/// Push the current branch to its upstream.
pub async fn push(repo_dir: &Path) -> Result<()> {
    git_in(repo_dir).arg("push").run_checked().await?;
    Ok(())
}

/// Capture the HEAD commit SHA of a repository.
///
/// Runs `git rev-parse HEAD` in the given directory. Returns an error if
/// the directory is not inside a git repository or if git is not available.
pub async fn head_sha(repo_dir: &Path) -> Result<String> {
    let sha = git_in(repo_dir)
        .args(["rev-parse", "HEAD"])
        .run_checked()
        .await?;
    if sha.is_empty() {
        return Err(ToolError::UnexpectedOutput {
            program: "git".to_string(),
            message: "rev-parse HEAD returned empty output".to_string(),
        });
    }
    Ok(sha)
}

/// Check whether a directory is inside a git work tree.
pub async fn is_repo(dir: &Path) -> bool {
    git_in(dir)
        .args(["rev-parse", "--is-inside-work-tree"])
        .run()
        .await
        .map(|o| o.success())
        .unwrap_or(false)
}

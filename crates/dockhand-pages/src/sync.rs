//! Repository synchronizer: clone on first sight, pull afterwards.

use std::path::Path;

use tracing::info;

use dockhand_core::git;

use crate::error::Result;

/// Bring the local clone of `url` at `target_dir` up to date, cloning it
/// first when the directory does not exist yet.
///
/// Directory existence is the signal: a completed clone leaves the
/// directory behind, so a present directory is treated as a repository and
/// pulled. Failures end the surrounding item; there is no retry and no
/// conflict handling.
pub async fn clone_or_update(url: &str, target_dir: &Path) -> Result<()> {
    if target_dir.exists() {
        info!(repo = %target_dir.display(), "updating existing clone");
        git::pull(target_dir).await?;
    } else {
        info!(url, target = %target_dir.display(), "cloning");
        git::clone(url, target_dir).await?;
    }
    Ok(())
}

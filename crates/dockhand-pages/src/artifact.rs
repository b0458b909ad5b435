//! Artifact download into a clean local directory.

use std::path::Path;

use tracing::info;

use dockhand_core::ToolCommand;

use crate::config::PagesConfig;
use crate::error::Result;
use crate::runs::RunId;

/// Clear a previous download and recreate the directory empty.
///
/// The whole tree goes, nested directories included; stale files from an
/// earlier artifact must not survive into the new one.
pub fn reset_artifact_dir(artifact_dir: &Path) -> std::io::Result<()> {
    if artifact_dir.exists() {
        std::fs::remove_dir_all(artifact_dir)?;
    }
    std::fs::create_dir_all(artifact_dir)
}

/// Download the pages artifact of run `id` into `artifact_dir`.
///
/// The directory is reset first. The download tool resolves `--dir`
/// relative to its own working directory, so the path is handed over
/// absolute.
pub async fn download_artifact(
    repo_dir: &Path,
    artifact_dir: &Path,
    id: RunId,
    config: &PagesConfig,
) -> Result<()> {
    reset_artifact_dir(artifact_dir)?;
    let abs_dir = artifact_dir.canonicalize()?;

    ToolCommand::new("gh")
        .current_dir(repo_dir)
        .args(["run", "download"])
        .arg(id.to_string())
        .args(["--name", &config.artifact_name, "--dir"])
        .arg(abs_dir.to_string_lossy())
        .timeout(config.download_timeout)
        .run_checked()
        .await?;

    info!(%id, dir = %artifact_dir.display(), "artifact downloaded");
    Ok(())
}

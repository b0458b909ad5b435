//! Pipeline configuration.

use std::time::Duration;

/// Tuning knobs for the pages pipeline.
///
/// The defaults match the GitHub Pages deployment machinery: the
/// `pages-build-deployment` workflow publishes a `github-pages` artifact
/// whose payload is a single `artifact.tar`, downloaded into an
/// `artifact/` directory inside the clone.
#[derive(Debug, Clone)]
pub struct PagesConfig {
    /// Workflow whose runs are triggered and watched.
    pub workflow: String,

    /// Name of the artifact to download from a finished run.
    pub artifact_name: String,

    /// Directory under the repository clone where the download lands.
    /// Distinct from `artifact_name`, which the CI service owns.
    pub artifact_dir_name: String,

    /// File name of the archive inside the downloaded artifact.
    pub archive_file_name: String,

    /// How long to wait for a pushed commit's run to appear in the listing.
    pub registration_timeout: Duration,

    /// First poll interval while waiting for registration.
    pub registration_poll_start: Duration,

    /// Poll interval cap; intervals double until they reach it.
    pub registration_poll_cap: Duration,

    /// How long a watched run may take to reach a terminal state.
    pub watch_timeout: Duration,

    /// How long an artifact download may take.
    pub download_timeout: Duration,
}

impl Default for PagesConfig {
    fn default() -> Self {
        PagesConfig {
            workflow: "pages-build-deployment".to_string(),
            artifact_name: "github-pages".to_string(),
            artifact_dir_name: "artifact".to_string(),
            archive_file_name: "artifact.tar".to_string(),
            registration_timeout: Duration::from_secs(180),
            registration_poll_start: Duration::from_secs(2),
            registration_poll_cap: Duration::from_secs(30),
            watch_timeout: Duration::from_secs(30 * 60),
            download_timeout: Duration::from_secs(10 * 60),
        }
    }
}

impl PagesConfig {
    /// Config for a differently named workflow, defaults otherwise.
    pub fn for_workflow(workflow: &str) -> Self {
        PagesConfig {
            workflow: workflow.to_string(),
            ..Default::default()
        }
    }
}

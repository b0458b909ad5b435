//! Batch driver: the per-repository sequence and the loop over the
//! manifest.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info};

use crate::archive;
use crate::artifact;
use crate::config::PagesConfig;
use crate::error::{PagesError, Result};
use crate::manifest::{self, RepoEntry};
use crate::runs::RunId;
use crate::sync;
use crate::trigger;

/// Outcome of one completed manifest entry.
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Label from the manifest row.
    pub label: String,

    /// Local repository directory.
    pub repo_dir: PathBuf,

    /// The run that produced the downloaded artifact.
    pub run_id: RunId,

    /// Entries extracted from the artifact archive.
    pub extracted_entries: usize,

    /// Wall-clock time for the whole item in milliseconds.
    pub duration_ms: u64,
}

/// A manifest entry the driver could not complete.
#[derive(Debug)]
pub struct ItemFailure {
    pub label: String,
    pub url: String,
    pub error: PagesError,
}

/// Counts and failures for a whole batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Entries taken from the manifest.
    pub processed: usize,

    /// Reports for entries that completed.
    pub reports: Vec<ItemReport>,

    /// Entries that failed, in manifest order.
    pub failures: Vec<ItemFailure>,
}

impl BatchSummary {
    /// Number of entries that completed.
    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    /// Whether every processed entry completed.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the full per-repository sequence: derive the directory, sync,
/// trigger and watch the workflow, download the artifact, extract it.
///
/// The first failing step ends the item; later steps are not attempted.
pub async fn process_repo(
    base_dir: &Path,
    entry: &RepoEntry,
    config: &PagesConfig,
) -> Result<ItemReport> {
    let start = Instant::now();

    let name = manifest::repo_dir_name(&entry.url)?;
    let repo_dir = base_dir.join(&name);
    let artifact_dir = repo_dir.join(&config.artifact_dir_name);

    sync::clone_or_update(&entry.url, &repo_dir).await?;
    let run_id = trigger::trigger_workflow(&repo_dir, config).await?;
    artifact::download_artifact(&repo_dir, &artifact_dir, run_id, config).await?;
    let extracted_entries = archive::extract_archive(&artifact_dir, config)?;

    Ok(ItemReport {
        label: entry.label.clone(),
        repo_dir,
        run_id,
        extracted_entries,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Process every manifest entry, in file order, one at a time.
///
/// A failed entry is logged and recorded in the summary; the batch always
/// moves on to the next one. The manifest failing to load is the only
/// hard error.
pub async fn run_batch(
    manifest_path: &Path,
    base_dir: &Path,
    config: &PagesConfig,
) -> Result<BatchSummary> {
    let entries = manifest::load_manifest(manifest_path)?;
    std::fs::create_dir_all(base_dir)?;

    info!(entries = entries.len(), base = %base_dir.display(), "starting batch");

    let mut summary = BatchSummary::default();
    for entry in entries {
        summary.processed += 1;
        info!(label = %entry.label, url = %entry.url, "processing repository");

        match process_repo(base_dir, &entry, config).await {
            Ok(report) => {
                info!(
                    label = %report.label,
                    run = %report.run_id,
                    entries = report.extracted_entries,
                    duration_ms = report.duration_ms,
                    "repository done"
                );
                summary.reports.push(report);
            }
            Err(e) => {
                error!(label = %entry.label, error = %e, "repository failed, continuing");
                summary.failures.push(ItemFailure {
                    label: entry.label,
                    url: entry.url,
                    error: e,
                });
            }
        }
    }

    info!(
        processed = summary.processed,
        succeeded = summary.succeeded(),
        failed = summary.failures.len(),
        "batch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn summary_counts() {
        let summary = BatchSummary {
            processed: 2,
            reports: vec![ItemReport {
                label: "site".to_string(),
                repo_dir: PathBuf::from("repos/site"),
                run_id: RunId(42),
                extracted_entries: 3,
                duration_ms: 10,
            }],
            failures: vec![ItemFailure {
                label: "broken".to_string(),
                url: "u".to_string(),
                error: PagesError::InvalidRepoUrl {
                    url: "u".to_string(),
                },
            }],
        };

        assert_eq!(summary.succeeded(), 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn empty_summary_is_all_succeeded() {
        assert!(BatchSummary::default().all_succeeded());
    }

    #[tokio::test]
    async fn missing_manifest_is_a_hard_error() {
        let base = tempfile::tempdir().unwrap();
        let err = run_batch(
            Path::new("/no/such/repos.csv"),
            base.path(),
            &PagesConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PagesError::ManifestMissing { .. }));
    }

    #[tokio::test]
    async fn bad_url_is_recorded_and_batch_continues() {
        // ".git" strips to an empty name, failing the entry before any
        // tool runs; the second row fails the same way.
        let base = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ".git,First Broken").unwrap();
        writeln!(file, "/,Second Broken").unwrap();
        file.flush().unwrap();

        let summary = run_batch(file.path(), base.path(), &PagesConfig::default())
            .await
            .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded(), 0);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].label, "First Broken");
        assert!(matches!(
            summary.failures[0].error,
            PagesError::InvalidRepoUrl { .. }
        ));
    }
}

//! Dockhand Pages - GitHub Pages artifact pipeline
//!
//! Keeps local mirrors of published Pages sites up to date:
//! - Syncs each repository (clone on first sight, pull afterwards)
//! - Triggers the pages workflow with an empty commit and watches the run
//! - Downloads the `github-pages` artifact and unpacks it in place
//! - Drives the whole sequence from a CSV manifest, one repository at a time

pub mod archive;
pub mod artifact;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod runs;
pub mod sync;
pub mod trigger;

// Re-export key types
pub use config::PagesConfig;
pub use error::PagesError;
pub use manifest::{load_manifest, repo_dir_name, RepoEntry};
pub use pipeline::{run_batch, BatchSummary, ItemFailure, ItemReport};
pub use runs::{latest_run_id, run_id_for_sha, RunId, WorkflowRun};

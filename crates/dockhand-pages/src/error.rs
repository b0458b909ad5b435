//! Error types for the pages pipeline.

use std::path::PathBuf;

use thiserror::Error;

use dockhand_core::ToolError;

/// Errors that can occur while pulling a pages artifact.
#[derive(Error, Debug)]
pub enum PagesError {
    /// No repository name could be derived from a manifest url.
    #[error("cannot derive a repository name from url: {url}")]
    InvalidRepoUrl { url: String },

    /// The batch manifest does not exist.
    #[error("manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// The batch manifest could not be read.
    #[error("manifest error: {0}")]
    Manifest(#[from] csv::Error),

    /// The pushed commit never showed up in the run listing.
    #[error("no run of {workflow} registered for {sha} within {secs}s")]
    RegistrationTimeout {
        workflow: String,
        sha: String,
        secs: u64,
    },

    /// The downloaded artifact does not contain the expected archive.
    #[error("archive not found: {path}")]
    ArchiveMissing { path: PathBuf },

    /// An archive entry would land outside the artifact directory.
    #[error("archive entry escapes the artifact directory: {entry}")]
    UnsafeArchiveEntry { entry: String },

    /// An external tool failed underneath a pipeline step.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pages pipeline operations.
pub type Result<T> = std::result::Result<T, PagesError>;

//! Error types for the contact-notes session.

use std::path::PathBuf;

use thiserror::Error;

use dockhand_core::ToolError;

/// Errors raised while annotating contacts.
#[derive(Error, Debug)]
pub enum NotesError {
    /// The contacts export does not exist.
    #[error("contacts file not found: {path}")]
    ContactsMissing { path: PathBuf },

    /// The contacts export is not valid JSON.
    #[error("contacts file is not valid JSON: {0}")]
    ContactsInvalid(#[from] serde_json::Error),

    /// The contacts export carries no `connections` list.
    #[error("contacts file has no connections list")]
    MissingConnections,

    /// The capture produced no recognizable words.
    #[error("speech was unintelligible")]
    Unintelligible,

    /// The speech service could not be reached or refused the request.
    #[error("speech service request failed: {0}")]
    SpeechRequest(String),

    /// A local audio tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for NotesError {
    fn from(err: reqwest::Error) -> Self {
        NotesError::SpeechRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;

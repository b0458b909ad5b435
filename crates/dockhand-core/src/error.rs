//! Error types for external tool invocation.

use thiserror::Error;

/// Errors that can occur when running an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program is not on PATH.
    #[error("{program} is not installed or not in PATH")]
    NotFound { program: String },

    /// The tool ran and reported failure.
    #[error("{program} {args} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        program: String,
        args: String,
        exit_code: i32,
        stderr: String,
    },

    /// The tool did not finish within the allowed time.
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The tool succeeded but printed something unusable.
    #[error("{program} produced unexpected output: {message}")]
    UnexpectedOutput { program: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tool invocations.
pub type Result<T> = std::result::Result<T, ToolError>;

//! Dockhand Core Library
//!
//! Shared plumbing for the dockhand tools: external-tool invocation with
//! captured output, git and S3 collaborators, and tracing setup.

pub mod error;
pub mod exec;
pub mod git;
pub mod s3;
pub mod telemetry;

pub use error::ToolError;
pub use exec::{ToolCommand, ToolOutput};
pub use s3::{ensure_bucket, BucketError, BucketStatus};
pub use telemetry::init_tracing;

/// Dockhand version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

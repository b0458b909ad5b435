//! S3 bucket helper over the `aws` CLI.
//!
//! Checks for a bucket with `s3api head-bucket` and creates it when the
//! service answers 404. The AWS CLI reports the HTTP status in stderr; the
//! process exit code is the CLI's generic failure code, so the 404 marker
//! is matched in stderr.

use tracing::{debug, info};

use crate::error::ToolError;
use crate::exec::ToolCommand;

/// Outcome of [`ensure_bucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    /// The bucket already existed; nothing was changed.
    AlreadyExists,
    /// The bucket was created in the requested region.
    Created,
}

/// Errors from the bucket helper.
#[derive(Debug, thiserror::Error)]
pub enum BucketError {
    /// The `aws` CLI is not on PATH.
    #[error("aws is not installed or not in PATH")]
    AwsNotFound,

    /// head-bucket failed for a reason other than a missing bucket.
    #[error("bucket check failed (exit {exit_code}): {stderr}")]
    Check { exit_code: i32, stderr: String },

    /// create-bucket failed.
    #[error("bucket create failed (exit {exit_code}): {stderr}")]
    Create { exit_code: i32, stderr: String },

    /// Spawn or timeout failure underneath the CLI call.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl BucketError {
    /// Exit code to report to the caller's shell. Check/create failures
    /// forward the tool's own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            BucketError::AwsNotFound => 127,
            BucketError::Check { exit_code, .. } | BucketError::Create { exit_code, .. } => {
                *exit_code
            }
            BucketError::Tool(_) => 1,
        }
    }
}

fn map_tool_err(err: ToolError) -> BucketError {
    match err {
        ToolError::NotFound { .. } => BucketError::AwsNotFound,
        other => BucketError::Tool(other),
    }
}

/// Whether a head-bucket stderr indicates the bucket does not exist, as
/// opposed to a permission or transport problem.
fn is_missing_bucket(stderr: &str) -> bool {
    stderr.contains("(404)") || stderr.contains("Not Found")
}

/// Make sure `bucket` exists, creating it in `region` when it does not.
pub async fn ensure_bucket(bucket: &str, region: &str) -> Result<BucketStatus, BucketError> {
    let head = ToolCommand::new("aws")
        .args(["s3api", "head-bucket", "--bucket"])
        .arg(bucket)
        .run()
        .await
        .map_err(map_tool_err)?;

    if head.success() {
        debug!(bucket, "bucket already exists");
        return Ok(BucketStatus::AlreadyExists);
    }

    if !is_missing_bucket(&head.stderr) {
        return Err(BucketError::Check {
            exit_code: head.exit_code,
            stderr: head.stderr.trim().to_string(),
        });
    }

    info!(bucket, region, "bucket not found, creating");
    let create = ToolCommand::new("aws")
        .args(["s3api", "create-bucket", "--bucket"])
        .arg(bucket)
        .arg("--region")
        .arg(region)
        .arg("--create-bucket-configuration")
        .arg(format!("LocationConstraint={region}"))
        .run()
        .await
        .map_err(map_tool_err)?;

    if !create.success() {
        return Err(BucketError::Create {
            exit_code: create.exit_code,
            stderr: create.stderr.trim().to_string(),
        });
    }

    info!(bucket, "bucket created");
    Ok(BucketStatus::Created)
}

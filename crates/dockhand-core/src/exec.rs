//! External tool invocation with captured output.
//!
//! Every dockhand component that shells out (`git`, `gh`, `aws`, the audio
//! tools) goes through [`ToolCommand`]. Commands name their working
//! directory explicitly; nothing in this workspace changes the process-wide
//! current directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// An external command: program, argv, working directory, optional timeout.
///
/// No shell is involved; arguments are passed through verbatim.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Start building a command for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the caller's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Kill the command if it runs longer than `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// The program this command invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argv rendered for log and error messages.
    pub fn rendered_args(&self) -> String {
        self.args.join(" ")
    }

    /// Execute and capture output.
    ///
    /// A non-zero exit is *not* an error here; inspect
    /// [`ToolOutput::success`] or use [`ToolCommand::run_checked`]. Errors
    /// are reserved for a missing executable, a timeout, or spawn failures.
    pub async fn run(&self) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            // stdin is closed so an interactive prompt fails instead of
            // blocking the process forever.
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        debug!(program = %self.program, args = %self.rendered_args(), "running tool");

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                ToolError::Io(e)
            }
        })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ToolError::Timeout {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            program = %self.program,
            exit_code,
            duration_ms = duration.as_millis() as u64,
            "tool finished"
        );

        Ok(ToolOutput {
            exit_code,
            stdout,
            stderr,
            duration,
        })
    }

    /// Execute, requiring exit code 0. Returns trimmed stdout.
    pub async fn run_checked(&self) -> Result<String, ToolError> {
        let output = self.run().await?;
        if !output.success() {
            return Err(ToolError::CommandFailed {
                program: self.program.clone(),
                args: self.rendered_args(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

/// Captured result of a tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (0 = success; -1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Wall-clock run time.
    pub duration: Duration,
}

impl ToolOutput {
    /// Whether the tool exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

//! External process execution.
//!
//! Every query runs at most one external program through a [`CommandRunner`].
//! The runner captures the whole output, reports the exit code, and leaves
//! the interpretation of that code to the caller.

use crate::error::{NavError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub output: String,
}

impl ProcessOutput {
    /// 終了コード付きの出力
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            output: output.into(),
        }
    }
}

/// Executes a program with an argument list and captures its output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Whether `program` can be located before trying to run it.
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` with `args` exactly as given and wait for it to exit.
    ///
    /// A non-zero exit is not an error here; it is returned in
    /// [`ProcessOutput::code`]. Fails with [`NavError::ToolNotFound`] when the
    /// program cannot be started because it does not exist.
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput>;
}

/// Runs programs with `tokio::process`, optionally under a deadline.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    capture_stderr: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// タイムアウトなし・stderr 破棄のランナー
    pub fn new() -> Self {
        Self {
            timeout: None,
            capture_stderr: false,
        }
    }

    /// Kill the process and fail with [`NavError::Timeout`] once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append stderr to the captured stdout.
    pub fn with_stderr(mut self, capture_stderr: bool) -> Self {
        self.capture_stderr = capture_stderr;
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if self.capture_stderr {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            // Dropping the wait future on timeout must not leave the child behind
            .kill_on_drop(true);

        log::debug!("Executing {}: {:?}", program, args);

        let child = cmd.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                NavError::ToolNotFound {
                    tool: program.to_string(),
                }
            } else {
                NavError::Spawn {
                    tool: program.to_string(),
                    source,
                }
            }
        })?;

        let started = Instant::now();
        let waited = match self.timeout {
            Some(deadline) => match tokio::time::timeout(deadline, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    log::warn!("{} timed out after {:?}, killing it", program, deadline);
                    return Err(NavError::Timeout {
                        tool: program.to_string(),
                        elapsed: started.elapsed(),
                    });
                }
            },
            None => child.wait_with_output().await,
        };
        let raw = waited.map_err(|source| NavError::Spawn {
            tool: program.to_string(),
            source,
        })?;

        let mut output = String::from_utf8_lossy(&raw.stdout).into_owned();
        if self.capture_stderr && !raw.stderr.is_empty() {
            output.push_str(&String::from_utf8_lossy(&raw.stderr));
        }

        log::debug!(
            "{} exited with {:?} after {:?} ({} bytes of output)",
            program,
            raw.status.code(),
            started.elapsed(),
            output.len()
        );

        Ok(ProcessOutput {
            code: raw.status.code(),
            output,
        })
    }
}

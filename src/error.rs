//! Error types shared by every query entry point.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while invoking the external tools or interpreting their output.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The search or listing binary could not be located on `PATH`.
    #[error("`{tool}` was not found on PATH; install it or set its binary path in the config")]
    ToolNotFound { tool: String },

    /// The search tool exited with a code other than 0 (matches) or 1 (no matches).
    #[error("search tool failed with exit code {code:?}: {output}")]
    SearchTool { code: Option<i32>, output: String },

    /// The file listing tool exited with a non-zero code.
    #[error("file listing tool failed with exit code {code:?}: {output}")]
    FileTool { code: Option<i32>, output: String },

    /// A line of search output did not have the `<path> <line>:<col>:<text>` shape.
    #[error("unparsable search output line: {line:?}")]
    UnparsableLine { line: String },

    /// The external process did not finish within the configured deadline.
    #[error("`{tool}` did not finish within {elapsed:?}")]
    Timeout { tool: String, elapsed: Duration },

    /// The process could not be spawned for a reason other than a missing binary.
    #[error("failed to run `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NavError>;

impl NavError {
    /// Exit code carried by a tool failure, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            NavError::SearchTool { code, .. } | NavError::FileTool { code, .. } => *code,
            _ => None,
        }
    }

    /// `true` for failures that indicate missing setup rather than a bad query.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, NavError::ToolNotFound { .. } | NavError::Config(_))
    }
}

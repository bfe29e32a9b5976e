//! ripgrep invocation
//!
//! Builds the argument vector for a recursive regex search over the
//! configured note types and interprets ripgrep's exit-code convention.

use super::runner::CommandRunner;
use crate::config::NavConfig;
use crate::error::{NavError, Result};
use std::path::Path;
use std::sync::Arc;

/// ripgrep が「マッチなし」を表す終了コード
const EXIT_NO_MATCHES: i32 = 1;

/// Regex search over the note corpus using ripgrep.
#[derive(Clone)]
pub struct RipgrepSearcher {
    runner: Arc<dyn CommandRunner>,
    config: Arc<NavConfig>,
}

impl RipgrepSearcher {
    /// ripgrep 検索を作成
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<NavConfig>) -> Self {
        Self { runner, config }
    }

    /// 使用する ripgrep の実行ファイル名
    pub fn binary(&self) -> &str {
        &self.config.rg_binary
    }

    /// Argument vector for searching `pattern` under `root`.
    ///
    /// The pattern always goes through `--regexp` so that an empty pattern is
    /// accepted and matches every line. Output is one matching line per
    /// output line: `<path>\0<line>:<column>:<text>`.
    pub fn build_args(&self, pattern: &str, root: &Path, extra_args: &[String]) -> Vec<String> {
        let mut args: Vec<String> = [
            "--no-config",
            "--color=never",
            "--no-heading",
            "--with-filename",
            "--line-number",
            "--column",
            "--null",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for file_type in &self.config.extensions {
            args.push("--type".to_string());
            args.push(file_type.clone());
        }

        args.extend(extra_args.iter().cloned());

        args.push("--regexp".to_string());
        args.push(pattern.to_string());
        args.push("--".to_string());
        args.push(root.to_string_lossy().into_owned());
        args
    }

    /// Search `pattern` under `dir` (or the configured root) and return the raw output.
    ///
    /// An empty string means the search ran and found nothing.
    pub async fn search(&self, pattern: &str, dir: Option<&Path>, extra_args: &[String]) -> Result<String> {
        let binary = self.binary();
        if !self.runner.is_available(binary) {
            return Err(NavError::ToolNotFound {
                tool: binary.to_string(),
            });
        }

        let root = self.config.resolve_root(dir)?;
        let args = self.build_args(pattern, &root, extra_args);
        let result = self.runner.run(binary, &args).await?;

        match result.code {
            Some(0) => Ok(result.output),
            Some(EXIT_NO_MATCHES) => {
                log::debug!("No matches for {:?} under {}", pattern, root.display());
                Ok(String::new())
            }
            code => Err(NavError::SearchTool {
                code,
                output: result.output,
            }),
        }
    }
}

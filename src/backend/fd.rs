//! fd invocation for listing note files.

use super::runner::CommandRunner;
use crate::config::NavConfig;
use crate::error::{NavError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lists regular note files recursively with fd.
#[derive(Clone)]
pub struct FileDiscoverer {
    runner: Arc<dyn CommandRunner>,
    config: Arc<NavConfig>,
}

impl FileDiscoverer {
    /// fd 呼び出しを作成
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<NavConfig>) -> Self {
        Self { runner, config }
    }

    /// 使用する fd の実行ファイル名
    pub fn binary(&self) -> &str {
        &self.config.fd_binary
    }

    /// fd に渡す引数列（絶対パス・通常ファイル・拡張子で絞り込み）
    pub fn build_args(&self, root: &Path) -> Vec<String> {
        let mut args = vec![
            ".".to_string(),
            root.to_string_lossy().into_owned(),
            "--absolute-path".to_string(),
            "--type".to_string(),
            "f".to_string(),
            "--color=never".to_string(),
        ];
        for ext in &self.config.extensions {
            args.push("--extension".to_string());
            args.push(ext.clone());
        }
        args
    }

    /// Raw fd output: one absolute path per line.
    pub async fn list_files(&self, dir: Option<&Path>) -> Result<String> {
        let binary = self.binary();
        if !self.runner.is_available(binary) {
            return Err(NavError::ToolNotFound {
                tool: binary.to_string(),
            });
        }

        let root = self.config.resolve_root(dir)?;
        let result = self.runner.run(binary, &self.build_args(&root)).await?;
        match result.code {
            Some(0) => Ok(result.output),
            code => Err(NavError::FileTool {
                code,
                output: result.output,
            }),
        }
    }

    /// Listed files as paths, blank lines dropped.
    pub async fn files(&self, dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let output = self.list_files(dir).await?;
        Ok(split_paths(&output))
    }
}

/// fd の出力を行ごとのパスに分割
pub fn split_paths(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

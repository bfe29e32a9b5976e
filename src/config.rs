//! Read-only configuration threaded into every query.
//!
//! A `NavConfig` is built once (from defaults, a JSON file, CLI flags, or in
//! code) and shared by reference; nothing mutates it while a query runs.

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where queries run when the caller does not pass a directory.
#[derive(Clone)]
pub enum SearchRoot {
    Path(PathBuf),
    /// Computed on every resolution, e.g. "the directory of the current note".
    Computed(Arc<dyn Fn() -> PathBuf + Send + Sync>),
}

impl SearchRoot {
    /// 解決のたびに評価されるルート
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> PathBuf + Send + Sync + 'static,
    {
        SearchRoot::Computed(Arc::new(f))
    }

    /// ルートディレクトリを解決
    pub fn resolve(&self) -> PathBuf {
        match self {
            SearchRoot::Path(path) => path.clone(),
            SearchRoot::Computed(f) => f(),
        }
    }
}

impl fmt::Debug for SearchRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchRoot::Path(path) => f.debug_tuple("Path").field(path).finish(),
            SearchRoot::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl<'de> Deserialize<'de> for SearchRoot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        PathBuf::deserialize(deserializer).map(SearchRoot::Path)
    }
}

/// Column budgets used only by the display formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayWidths {
    pub title: usize,
    pub location: usize,
}

impl Default for DisplayWidths {
    fn default() -> Self {
        Self {
            title: 60,
            location: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub default_root: Option<SearchRoot>,
    /// File extensions of outline documents. Each one is also used as a
    /// ripgrep `--type` identifier.
    pub extensions: Vec<String>,
    pub rg_binary: String,
    pub fd_binary: String,
    /// Deadline for a single external process; `None` waits forever.
    #[serde(deserialize_with = "deserialize_timeout_ms", rename = "timeout_ms")]
    pub timeout: Option<Duration>,
    /// Append stderr to the captured output.
    pub capture_stderr: bool,
    pub widths: DisplayWidths,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            default_root: None,
            extensions: vec!["org".to_string()],
            rg_binary: "rg".to_string(),
            fd_binary: "fd".to_string(),
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            capture_stderr: false,
            widths: DisplayWidths::default(),
        }
    }
}

fn deserialize_timeout_ms<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = Option::<u64>::deserialize(deserializer)?;
    // 0 はタイムアウト無効
    Ok(ms.filter(|ms| *ms > 0).map(Duration::from_millis))
}

impl NavConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| NavError::ReadDocument {
            path: path.to_path_buf(),
            source,
        })?;
        let config: NavConfig = serde_json::from_str(&text)
            .map_err(|e| NavError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 拡張子の検証（空・不正文字はエラー）
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(NavError::Config("at least one extension is required".to_string()));
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        {
            return Err(NavError::Config(format!("invalid extension {:?}", bad)));
        }
        Ok(())
    }

    /// デフォルトの検索ルートを設定
    pub fn with_default_root(mut self, root: SearchRoot) -> Self {
        self.default_root = Some(root);
        self
    }

    /// 対象拡張子を差し替え
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// 外部プロセスの期限を設定（None で無制限）
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the directory a query runs in: explicit argument, then the
    /// configured default root, then the process working directory.
    pub fn resolve_root(&self, dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(root) = &self.default_root {
            return Ok(root.resolve());
        }
        std::env::current_dir()
            .map_err(|e| NavError::Config(format!("cannot determine current directory: {}", e)))
    }
}

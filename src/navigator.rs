//! Query entry points over a note corpus.
//!
//! A [`Navigator`] owns an immutable [`NavConfig`] and a [`CommandRunner`].
//! Each method issues at most one external process and returns freshly
//! built records; nothing is cached between calls, so a `Navigator` can be
//! shared across tasks.

use crate::backend::{CommandRunner, FileDiscoverer, ProcessRunner, RipgrepSearcher};
use crate::config::NavConfig;
use crate::error::Result;
use crate::parsers::links::{extract_links, LinkFilter, OrgDocument};
use crate::parsers::match_line::parse_output;
use crate::searchers::{BacklinkResolver, HeadingIndexer};
use crate::types::{Backlink, Heading, Link, MatchRecord};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct Navigator {
    config: Arc<NavConfig>,
    searcher: RipgrepSearcher,
    discoverer: FileDiscoverer,
    headings: HeadingIndexer,
    backlinks: BacklinkResolver,
}

impl Navigator {
    /// Navigator backed by real processes, honouring the configured deadline.
    pub fn new(config: NavConfig) -> Result<Self> {
        let runner = ProcessRunner::new()
            .with_timeout(config.timeout)
            .with_stderr(config.capture_stderr);
        Self::with_runner(config, Arc::new(runner))
    }

    /// Navigator with a custom runner; the config is validated first.
    pub fn with_runner(config: NavConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let searcher = RipgrepSearcher::new(runner.clone(), config.clone());
        let discoverer = FileDiscoverer::new(runner, config.clone());
        Ok(Self {
            headings: HeadingIndexer::new(searcher.clone()),
            backlinks: BacklinkResolver::new(searcher.clone()),
            config,
            searcher,
            discoverer,
        })
    }

    /// 設定を取得
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// 検索ルートを解決（引数 → 設定 → カレントディレクトリ）
    pub fn resolve_root(&self, dir: Option<&Path>) -> Result<PathBuf> {
        self.config.resolve_root(dir)
    }

    /// Note files under the root, as absolute paths.
    pub async fn files(&self, dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        self.discoverer.files(dir).await
    }

    /// The first line of every note file, via an empty-pattern search.
    pub async fn file_previews(&self, dir: Option<&Path>) -> Result<Vec<MatchRecord>> {
        let extra = ["--max-count".to_string(), "1".to_string()];
        let output = self.searcher.search("", dir, &extra).await?;
        Ok(parse_output(&output).records)
    }

    /// Lines matching a regular expression.
    pub async fn grep(&self, pattern: &str, dir: Option<&Path>) -> Result<Vec<MatchRecord>> {
        // ripgrep と同じ構文なので事前に検証しておく
        Regex::new(pattern)?;
        let output = self.searcher.search(pattern, dir, &[]).await?;
        Ok(parse_output(&output).records)
    }

    /// すべての見出し（タグは任意）
    pub async fn headings(&self, dir: Option<&Path>) -> Result<Vec<Heading>> {
        self.headings.find_headings(dir, false).await
    }

    /// タグ付き見出しのみ
    pub async fn tagged_headings(&self, dir: Option<&Path>) -> Result<Vec<Heading>> {
        self.headings.find_headings(dir, true).await
    }

    /// Headings carrying `tag`.
    pub async fn headings_with_tag(&self, tag: &str, dir: Option<&Path>) -> Result<Vec<Heading>> {
        let headings = self.tagged_headings(dir).await?;
        Ok(headings.into_iter().filter(|h| h.has_tag(tag)).collect())
    }

    /// 見出しで使われているタグ一覧（重複なし・ソート済み）
    pub async fn tags(&self, dir: Option<&Path>) -> Result<Vec<String>> {
        self.headings.tags(dir).await
    }

    /// Link strings in `file`, selected by `filter`.
    pub async fn links(&self, file: &Path, filter: LinkFilter) -> Result<Vec<String>> {
        let document = OrgDocument::load(file).await?;
        Ok(extract_links(&document, filter).collect())
    }

    /// Typed links in `file`.
    pub async fn link_details(&self, file: &Path) -> Result<Vec<Link>> {
        let document = OrgDocument::load(file).await?;
        Ok(document.links().collect())
    }

    /// `target` へのリンクを含む行（ファイル名のみで照合）
    pub async fn backlinks(&self, target: &Path, dir: Option<&Path>) -> Result<Vec<Backlink>> {
        self.backlinks.find_backlinks(target, dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockCommandRunner, ProcessOutput};
    use crate::error::NavError;
    use crate::types::LinkKind;

    fn navigator(mock: MockCommandRunner) -> Navigator {
        Navigator::with_runner(NavConfig::default(), Arc::new(mock)).unwrap()
    }

    #[tokio::test]
    async fn test_file_previews_use_empty_pattern() {
        let mut mock = MockCommandRunner::new();
        mock.expect_is_available().returning(|_| true);
        mock.expect_run()
            .withf(|_, args| {
                let regexp = args.iter().position(|a| a == "--regexp").unwrap();
                args[regexp + 1].is_empty() && args.iter().any(|a| a == "--max-count")
            })
            .returning(|_, _| Ok(ProcessOutput::new(0, "/n/a.org\u{0}1:1:#+title: A\n")));

        let previews = navigator(mock).file_previews(Some(Path::new("/n"))).await.unwrap();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].matched_text, "#+title: A");
    }

    #[tokio::test]
    async fn test_grep_rejects_invalid_regex_without_running() {
        let mut mock = MockCommandRunner::new();
        mock.expect_is_available().returning(|_| true);
        mock.expect_run().never();

        let err = navigator(mock).grep("(unclosed", Some(Path::new("/n"))).await.unwrap_err();
        assert!(matches!(err, NavError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn test_headings_with_tag() {
        let mut mock = MockCommandRunner::new();
        mock.expect_is_available().returning(|_| true);
        mock.expect_run().returning(|_, _| {
            Ok(ProcessOutput::new(
                0,
                "/n/a.org\u{0}1:1:* A :work:\n/n/a.org\u{0}2:1:* B :home:\n",
            ))
        });

        let headings = navigator(mock).headings_with_tag("home", Some(Path::new("/n"))).await.unwrap();
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "B");
    }

    #[tokio::test]
    async fn test_links_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.org");
        std::fs::write(&file, "* A\n[[file:b.org][B]] [[https://example.com][E]]\n").unwrap();

        let nav = navigator(MockCommandRunner::new());
        assert_eq!(nav.links(&file, LinkFilter::File).await.unwrap(), vec!["b.org"]);
        assert_eq!(
            nav.links(&file, LinkFilter::Url).await.unwrap(),
            vec!["https://example.com"]
        );
        let details = nav.link_details(&file).await.unwrap();
        assert_eq!(details[0].kind, LinkKind::File);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = NavConfig::default().with_extensions(Vec::<String>::new());
        assert!(Navigator::with_runner(config, Arc::new(MockCommandRunner::new())).is_err());
    }
}

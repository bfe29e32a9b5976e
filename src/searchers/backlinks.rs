//! Backlink resolution.
//!
//! A backlink is any double-bracket link in the corpus whose target ends in
//! the bare file name of the document in question. Only the file name is
//! compared: two `index.org` files in different directories cannot be told
//! apart.

use crate::backend::RipgrepSearcher;
use crate::error::{NavError, Result};
use crate::parsers::match_line::{parse_output, raw_records};
use crate::types::{Backlink, MatchRecord};
use regex::Regex;
use std::path::Path;

/// Regex matching a link to `file_name`; group 1 captures the description.
///
/// Tolerates a scheme/colon or a directory prefix before the name and a
/// `::anchor` suffix after it.
pub fn backlink_pattern(file_name: &str) -> String {
    format!(
        r"\[\[(?:[^\[\]]*[:/])?{}(?:::[^\[\]]*)?\](?:\[([^\[\]]*)\])?\]",
        regex::escape(file_name)
    )
}

#[derive(Debug, Clone)]
pub struct BacklinkQuery {
    file_name: String,
    regex: Regex,
}

impl BacklinkQuery {
    /// 対象ファイル名からクエリを作成（ファイル名がなければエラー）
    pub fn new(target: &Path) -> Result<Self> {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| NavError::Config(format!("{} has no file name", target.display())))?;
        let regex = Regex::new(&backlink_pattern(&file_name))?;
        Ok(Self { file_name, regex })
    }

    /// 照合に使うファイル名
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 検索ツールに渡す正規表現
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// 行がこのファイルへのリンクを含むか
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Attach the link description found in the record's line, if any.
    pub fn refine(&self, record: MatchRecord) -> Backlink {
        let link_description = self
            .regex
            .captures(&record.matched_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|desc| !desc.is_empty());

        Backlink {
            file: record.file,
            line: record.line,
            column: record.column,
            link_description,
            context: record.matched_text,
        }
    }
}

#[derive(Clone)]
pub struct BacklinkResolver {
    searcher: RipgrepSearcher,
}

impl BacklinkResolver {
    /// バックリンク検索を作成
    pub fn new(searcher: RipgrepSearcher) -> Self {
        Self { searcher }
    }

    /// Raw search output lines for links pointing at `target`.
    pub async fn backlink_lines(&self, target: &Path, dir: Option<&Path>) -> Result<Vec<String>> {
        let query = BacklinkQuery::new(target)?;
        let output = self.searcher.search(query.pattern(), dir, &[]).await?;
        Ok(raw_records(&output).map(str::to_string).collect())
    }

    /// Backlinks to `target` with their link descriptions.
    pub async fn find_backlinks(&self, target: &Path, dir: Option<&Path>) -> Result<Vec<Backlink>> {
        let query = BacklinkQuery::new(target)?;
        log::debug!("Resolving backlinks to {}", query.file_name());

        let output = self.searcher.search(query.pattern(), dir, &[]).await?;
        Ok(parse_output(&output)
            .records
            .into_iter()
            .map(|record| query.refine(record))
            .collect())
    }
}

//! Heading and tag queries over the corpus.

use crate::backend::RipgrepSearcher;
use crate::error::Result;
use crate::parsers::heading::HeadingPattern;
use crate::parsers::match_line::{parse_output, raw_records};
use crate::types::{Heading, MatchRecord};
use std::collections::BTreeSet;
use std::path::Path;

/// Finds outline headings with ripgrep and rewrites them with [`HeadingPattern`].
#[derive(Clone)]
pub struct HeadingIndexer {
    searcher: RipgrepSearcher,
}

impl HeadingIndexer {
    /// 見出し検索を作成
    pub fn new(searcher: RipgrepSearcher) -> Self {
        Self { searcher }
    }

    /// Raw search output lines, one per heading occurrence.
    pub async fn heading_lines(&self, dir: Option<&Path>, tagged_only: bool) -> Result<Vec<String>> {
        let pattern = HeadingPattern::for_tagged_only(tagged_only);
        let output = self.searcher.search(pattern.pattern(), dir, &[]).await?;
        Ok(raw_records(&output).map(|line| line.trim_end().to_string()).collect())
    }

    /// Heading records whose text has been substituted: `title` or `title  tags`.
    pub async fn find_heading_records(&self, dir: Option<&Path>, tagged_only: bool) -> Result<Vec<MatchRecord>> {
        let pattern = HeadingPattern::for_tagged_only(tagged_only);
        let output = self.searcher.search(pattern.pattern(), dir, &[]).await?;

        Ok(parse_output(&output)
            .records
            .into_iter()
            .filter_map(|record| {
                let normalized = pattern.normalize(&record.matched_text)?;
                Some(MatchRecord {
                    matched_text: normalized,
                    ..record
                })
            })
            .collect())
    }

    /// 見出しを検索して `Heading` に変換
    pub async fn find_headings(&self, dir: Option<&Path>, tagged_only: bool) -> Result<Vec<Heading>> {
        let pattern = HeadingPattern::for_tagged_only(tagged_only);
        let output = self.searcher.search(pattern.pattern(), dir, &[]).await?;
        let parsed = parse_output(&output);

        let headings: Vec<Heading> = parsed
            .records
            .iter()
            .filter_map(|record| pattern.heading_from_record(record))
            .collect();
        log::debug!(
            "Found {} headings ({} records, tagged_only={})",
            headings.len(),
            parsed.records.len(),
            tagged_only
        );
        Ok(headings)
    }

    /// Every distinct tag used on a heading, sorted.
    pub async fn tags(&self, dir: Option<&Path>) -> Result<Vec<String>> {
        let headings = self.find_headings(dir, true).await?;
        let tags: BTreeSet<String> = headings
            .into_iter()
            .filter_map(|heading| heading.tags)
            .flatten()
            .collect();
        Ok(tags.into_iter().collect())
    }
}

//! Outline heading patterns and tag-cluster parsing.
//!
//! The same regular expressions are handed to ripgrep to select heading
//! lines and applied here to rewrite each selected line, producing the text
//! ripgrep's `--replace` would emit:
//!
//! - any heading: `$1` (the title)
//! - tagged heading: `$1  $2` (title, two spaces, tag cluster without the
//!   outer colons)
//!
//! Tag names may only contain ASCII letters, `|`, `:`, `@` and `_`.

use crate::types::{Heading, MatchRecord};
use regex::Regex;
use std::sync::OnceLock;

/// Heading with an optional trailing tag cluster.
pub const ANY_HEADING_PATTERN: &str = r"^\*+\s+(.*?)(?:\s+:[A-Za-z|:@_]+:)?\s*$";
/// Heading whose trailing tag cluster is mandatory.
pub const TAGGED_HEADING_PATTERN: &str = r"^\*+\s+(.*?)\s+:([A-Za-z|:@_]+):\s*$";

const ANY_HEADING_TEMPLATE: &str = "$1";
const TAGGED_HEADING_TEMPLATE: &str = "$1  $2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingFilter {
    Any,
    TaggedOnly,
}

fn any_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ANY_HEADING_PATTERN).expect("static regex"))
}

fn tagged_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAGGED_HEADING_PATTERN).expect("static regex"))
}

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("static regex"))
}

#[derive(Debug, Clone, Copy)]
pub struct HeadingPattern {
    filter: HeadingFilter,
}

impl HeadingPattern {
    /// 見出しパターンを作成
    pub fn new(filter: HeadingFilter) -> Self {
        Self { filter }
    }

    /// タグ必須かどうかでパターンを選択
    pub fn for_tagged_only(tagged_only: bool) -> Self {
        Self::new(if tagged_only {
            HeadingFilter::TaggedOnly
        } else {
            HeadingFilter::Any
        })
    }

    /// 現在のフィルター
    pub fn filter(&self) -> HeadingFilter {
        self.filter
    }

    /// Pattern passed to the search tool.
    pub fn pattern(&self) -> &'static str {
        match self.filter {
            HeadingFilter::Any => ANY_HEADING_PATTERN,
            HeadingFilter::TaggedOnly => TAGGED_HEADING_PATTERN,
        }
    }

    /// Capture substitution template, in `--replace` syntax.
    pub fn template(&self) -> &'static str {
        match self.filter {
            HeadingFilter::Any => ANY_HEADING_TEMPLATE,
            HeadingFilter::TaggedOnly => TAGGED_HEADING_TEMPLATE,
        }
    }

    fn regex(&self) -> &'static Regex {
        match self.filter {
            HeadingFilter::Any => any_regex(),
            HeadingFilter::TaggedOnly => tagged_regex(),
        }
    }

    /// 行が見出しとしてマッチするか
    pub fn is_match(&self, line: &str) -> bool {
        self.regex().is_match(line)
    }

    /// Apply the capture substitution to a raw heading line.
    ///
    /// Returns `None` when the line is not a heading of this kind.
    pub fn normalize(&self, line: &str) -> Option<String> {
        let regex = self.regex();
        if !regex.is_match(line) {
            return None;
        }
        Some(regex.replace(line, self.template()).trim().to_string())
    }

    /// Build a [`Heading`] from a search record whose text is the raw line.
    pub fn heading_from_record(&self, record: &MatchRecord) -> Option<Heading> {
        let raw = record.matched_text.as_str();
        let normalized = self.normalize(raw)?;

        let (title, tags) = match self.filter {
            HeadingFilter::TaggedOnly => {
                let mut parts = split_normalized(&normalized).into_iter();
                let title = parts.next().unwrap_or_default();
                (title, parts.next().and_then(|cluster| parse_tags(&cluster)))
            }
            HeadingFilter::Any => {
                // タグがあれば拾っておく
                let tags = tagged_regex()
                    .captures(raw)
                    .and_then(|caps| caps.get(2))
                    .and_then(|m| parse_tags(m.as_str()));
                (normalized, tags)
            }
        };

        Some(Heading {
            file: record.file.clone(),
            line: record.line,
            level: heading_level(raw),
            title,
            tags,
        })
    }
}

/// Split a normalized tagged-heading line into `[heading, tags]`.
///
/// The split happens at the last run of two or more whitespace characters;
/// a line without such a run yields just `[heading]`. Entries are trimmed
/// and empty entries dropped.
pub fn split_normalized(normalized: &str) -> Vec<String> {
    let trimmed = normalized.trim();
    let last_separator = separator_regex().find_iter(trimmed).last();

    let parts: Vec<&str> = match last_separator {
        Some(sep) => vec![&trimmed[..sep.start()], &trimmed[sep.end()..]],
        None => vec![trimmed],
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tag names from a colon-delimited cluster such as `work:urgent` or `:work:urgent:`.
///
/// Returns `None` when the cluster holds no tag names.
pub fn parse_tags(cluster: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = cluster
        .split(':')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Outline depth: the number of leading `*` markers.
pub fn heading_level(line: &str) -> usize {
    line.chars().take_while(|c| *c == '*').count()
}

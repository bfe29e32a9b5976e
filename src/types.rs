use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One line of search-tool output.
///
/// `line` is 1-based as reported by the tool, `column` has already been
/// converted to 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRecord {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub matched_text: String,
}

/// An outline heading found in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub file: PathBuf,
    pub line: usize,
    /// Number of leading `*` markers.
    pub level: usize,
    pub title: String,
    /// Trailing tag cluster; `None` when absent, never `Some(vec![])`.
    pub tags: Option<Vec<String>>,
}

impl Heading {
    /// タグを持つかどうか
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `file:` links and bare relative/absolute paths.
    File,
    /// `http:` / `https:` links.
    Url,
    /// Legacy `fuzzy:` alias wrapping a URL.
    Fuzzy,
    /// Everything else (internal heading links, custom schemes).
    Other,
}

impl LinkKind {
    /// 表示用の種別名
    pub fn name(&self) -> &'static str {
        match self {
            LinkKind::File => "file",
            LinkKind::Url => "url",
            LinkKind::Fuzzy => "fuzzy",
            LinkKind::Other => "other",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed link taken from a document's structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    /// Declared scheme without the colon; empty for scheme-less links.
    pub scheme: String,
    /// Path component after the scheme, without any `::anchor`.
    pub target: String,
    /// Search option following `::` in the target.
    pub anchor: Option<String>,
    pub description: Option<String>,
}

impl Link {
    /// The link reconstructed as `scheme:path` (anchor included), uninterpreted.
    pub fn raw(&self) -> String {
        let mut raw = if self.scheme.is_empty() {
            self.target.clone()
        } else {
            format!("{}:{}", self.scheme, self.target)
        };
        if let Some(anchor) = &self.anchor {
            raw.push_str("::");
            raw.push_str(anchor);
        }
        raw
    }
}

/// An inbound reference to a target document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    /// Description part of the `[[target][description]]` link, if present.
    pub link_description: Option<String>,
    /// The full referencing line.
    pub context: String,
}

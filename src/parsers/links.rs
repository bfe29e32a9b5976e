//! Link extraction from outline documents.
//!
//! Links are read from the document structure: bracket links
//! `[[target][description]]` / `[[target]]`, angle links `<scheme:path>` and
//! plain `scheme:path` links in paragraph text. Lines inside `#+begin_…` /
//! `#+end_…` blocks, comment lines and fixed-width `: ` lines are not
//! scanned.

use crate::error::{NavError, Result};
use crate::types::{Link, LinkKind};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Schemes recognised in angle and plain links.
const PLAIN_SCHEMES: &[&str] = &["file", "http", "https", "fuzzy", "mailto", "ftp", "doi", "id"];

const FUZZY_PREFIX: &str = "fuzzy:";

/// Which links [`extract_links`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFilter {
    /// `file:` links, as their path component.
    File,
    /// `http`, `https` and legacy `fuzzy` links, as full URLs.
    Url,
    /// Every link as `scheme:path`, uninterpreted.
    #[default]
    All,
}

/// The text of an outline document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgDocument {
    path: Option<PathBuf>,
    text: String,
}

impl OrgDocument {
    /// テキストからドキュメントを作成（パスなし）
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    /// ファイルを非同期に読み込む
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NavError::ReadDocument {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
        })
    }

    /// 読み込み元のパス
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// ドキュメント本文
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines that can carry links, in document order.
    fn content_lines(&self) -> impl Iterator<Item = &str> + '_ {
        let mut open_block: Option<String> = None;
        self.text.lines().filter(move |line| {
            let trimmed = line.trim_start();
            let lower = trimmed.to_ascii_lowercase();

            if open_block.is_some() {
                if open_block.as_deref().is_some_and(|end| lower.starts_with(end)) {
                    open_block = None;
                }
                return false;
            }
            if let Some(rest) = lower.strip_prefix("#+begin_") {
                let name: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
                open_block = Some(format!("#+end_{}", name));
                return false;
            }
            // コメント行と固定幅行
            if trimmed == "#" || trimmed.starts_with("# ") || trimmed == ":" || trimmed.starts_with(": ") {
                return false;
            }
            true
        })
    }

    /// Every link in the document, in order of appearance.
    ///
    /// Re-derived from the text on each call.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.content_lines().flat_map(links_in_line)
    }
}

/// Links of `document` selected by `filter`, each trimmed of surrounding whitespace.
pub fn extract_links(document: &OrgDocument, filter: LinkFilter) -> impl Iterator<Item = String> + '_ {
    document
        .links()
        .filter_map(move |link| select(&link, filter))
        .map(|s| s.trim().to_string())
}

fn select(link: &Link, filter: LinkFilter) -> Option<String> {
    match filter {
        LinkFilter::File => (link.kind == LinkKind::File).then(|| link.target.clone()),
        LinkFilter::Url => match link.kind {
            LinkKind::Url => Some(link.raw()),
            LinkKind::Fuzzy => {
                let raw = link.raw();
                Some(raw.strip_prefix(FUZZY_PREFIX).map(str::to_string).unwrap_or(raw))
            }
            _ => None,
        },
        LinkFilter::All => Some(link.raw()),
    }
}

fn bracket_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\[\]]+)\](?:\[([^\[\]]*)\])?\]").expect("static regex"))
}

fn angle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Za-z][A-Za-z0-9+.-]*):([^<>\n]+)>").expect("static regex"))
}

fn plain_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z][A-Za-z0-9+.-]*):([^\s()<>\[\]]+)").expect("static regex")
    })
}

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.-]+):(.*)$").expect("static regex"))
}

fn is_plain_scheme(scheme: &str) -> bool {
    PLAIN_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
}

/// Links found on a single content line, ordered by position.
fn links_in_line(line: &str) -> Vec<Link> {
    let mut found: Vec<(usize, usize, Link)> = Vec::new();
    let overlaps = |found: &[(usize, usize, Link)], start: usize, end: usize| {
        found.iter().any(|(s, e, _)| start < *e && *s < end)
    };

    for caps in bracket_regex().captures_iter(line) {
        let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let description = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|d| !d.is_empty());
        found.push((whole.start(), whole.end(), classify(target.as_str(), description)));
    }

    for caps in angle_regex().captures_iter(line) {
        let (Some(whole), Some(scheme), Some(path)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if !is_plain_scheme(scheme.as_str()) || overlaps(&found, whole.start(), whole.end()) {
            continue;
        }
        let raw = format!("{}:{}", scheme.as_str(), path.as_str());
        found.push((whole.start(), whole.end(), classify(&raw, None)));
    }

    for caps in plain_regex().captures_iter(line) {
        let (Some(whole), Some(scheme), Some(path)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if !is_plain_scheme(scheme.as_str()) || overlaps(&found, whole.start(), whole.end()) {
            continue;
        }
        let path = path.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', '\'', '"']);
        if path.is_empty() {
            continue;
        }
        let raw = format!("{}:{}", scheme.as_str(), path);
        found.push((whole.start(), whole.end(), classify(&raw, None)));
    }

    found.sort_by_key(|(start, _, _)| *start);
    found.into_iter().map(|(_, _, link)| link).collect()
}

/// Turn the inside of a link into a typed [`Link`].
fn classify(raw: &str, description: Option<String>) -> Link {
    let raw = raw.trim();

    if let Some(caps) = scheme_regex().captures(raw) {
        let scheme = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let path = caps.get(2).map_or("", |m| m.as_str());
        let lower = scheme.to_ascii_lowercase();

        let kind = match lower.as_str() {
            "file" => LinkKind::File,
            s if s.starts_with("file+") => LinkKind::File,
            "http" | "https" => LinkKind::Url,
            "fuzzy" => LinkKind::Fuzzy,
            _ => LinkKind::Other,
        };
        let (target, anchor) = if kind == LinkKind::File {
            split_anchor(path)
        } else {
            (path.to_string(), None)
        };
        return Link {
            kind,
            scheme,
            target,
            anchor,
            description,
        };
    }

    // スキームなし: パスらしければファイルリンク
    if raw.starts_with('/') || raw.starts_with("./") || raw.starts_with("../") || raw.starts_with("~/") {
        let (target, anchor) = split_anchor(raw);
        return Link {
            kind: LinkKind::File,
            scheme: "file".to_string(),
            target,
            anchor,
            description,
        };
    }

    Link {
        kind: LinkKind::Other,
        scheme: String::new(),
        target: raw.to_string(),
        anchor: None,
        description,
    }
}

fn split_anchor(path: &str) -> (String, Option<String>) {
    match path.split_once("::") {
        Some((file, anchor)) => (file.to_string(), Some(anchor.to_string()).filter(|a| !a.is_empty())),
        None => (path.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, filter: LinkFilter) -> Vec<String> {
        extract_links(&OrgDocument::from_text(text), filter).collect()
    }

    #[test]
    fn test_fuzzy_prefix_is_stripped_for_urls() {
        let links = collect("See [[fuzzy:https://example.com][Example]] now.", LinkFilter::Url);
        assert_eq!(links, vec!["https://example.com"]);
    }

    #[test]
    fn test_file_filter_yields_path_component() {
        assert_eq!(collect("[[file:a/b.org][B]]", LinkFilter::File), vec!["a/b.org"]);
        assert_eq!(
            collect("[[file:a/b.org::*Section][B]] [[./c.org]]", LinkFilter::File),
            vec!["a/b.org", "./c.org"]
        );
    }

    #[test]
    fn test_url_filter() {
        let text = "* Links\n[[https://rust-lang.org][Rust]] and [[file:x.org]] and http://example.org/a.\n";
        assert_eq!(
            collect(text, LinkFilter::Url),
            vec!["https://rust-lang.org", "http://example.org/a"]
        );
    }

    #[test]
    fn test_unfiltered_returns_scheme_and_path() {
        let text = "[[file:a.org::#id][A]] [[id:1234]] [[*Heading]] <mailto:me@example.com>";
        assert_eq!(
            collect(text, LinkFilter::All),
            vec!["file:a.org::#id", "id:1234", "*Heading", "mailto:me@example.com"]
        );
    }

    #[test]
    fn test_links_in_blocks_and_comments_are_ignored() {
        let text = "\
[[file:real.org]]
#+BEGIN_SRC sh
echo [[file:code.org]]
#+END_SRC
# [[file:comment.org]]
: [[file:fixed.org]]
#+begin_example
[[file:example.org]]
#+end_example
after [[file:after.org]]
";
        assert_eq!(collect(text, LinkFilter::File), vec!["real.org", "after.org"]);
    }

    #[test]
    fn test_link_descriptions_and_anchors() {
        let doc = OrgDocument::from_text("[[file:plans/2024.org::*Q1][ My 2024 Plan ]] [[https://x.io][]]");
        let links: Vec<Link> = doc.links().collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, LinkKind::File);
        assert_eq!(links[0].target, "plans/2024.org");
        assert_eq!(links[0].anchor.as_deref(), Some("*Q1"));
        assert_eq!(links[0].description.as_deref(), Some("My 2024 Plan"));
        assert_eq!(links[1].kind, LinkKind::Url);
        assert_eq!(links[1].description, None);
    }

    #[test]
    fn test_plain_link_inside_bracket_is_not_duplicated() {
        let links = collect("[[https://example.com/x][https://example.com/x]]", LinkFilter::Url);
        assert_eq!(links, vec!["https://example.com/x"]);
    }

    #[test]
    fn test_extraction_is_restartable() {
        let doc = OrgDocument::from_text("[[file:a.org]] [[file:b.org]]");
        let first: Vec<String> = extract_links(&doc, LinkFilter::File).collect();
        let second: Vec<String> = extract_links(&doc, LinkFilter::File).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_document() {
        let err = OrgDocument::load(Path::new("/definitely/not/here.org")).await.unwrap_err();
        assert!(matches!(err, NavError::ReadDocument { .. }));
    }
}

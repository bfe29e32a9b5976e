//! Parsing of search-tool output lines into [`MatchRecord`]s.
//!
//! Accepted shapes:
//! - `<path>\0<line>:<col>:<text>` (ripgrep with `--null`)
//! - `<path> <line>:<col>:<text>` (path ends at the first space followed by
//!   `<digits>:<digits>:`)

use crate::error::{NavError, Result};
use crate::types::MatchRecord;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

fn spaced_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?) (\d+):(\d+):(.*)$").expect("static regex"))
}

fn location_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+):(\d+):(.*)$").expect("static regex"))
}

/// Parse one line of search output.
pub fn parse_line(line: &str) -> Result<MatchRecord> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let unparsable = || NavError::UnparsableLine {
        line: line.replace('\0', " "),
    };

    let (path, line_no, column, text) = match line.split_once('\0') {
        Some((path, rest)) => {
            let caps = location_regex().captures(rest).ok_or_else(unparsable)?;
            (path, caps.get(1), caps.get(2), caps.get(3))
        }
        None => {
            let caps = spaced_line_regex().captures(line).ok_or_else(unparsable)?;
            let path = caps.get(1).map_or("", |m| m.as_str());
            (path, caps.get(2), caps.get(3), caps.get(4))
        }
    };

    if path.is_empty() {
        return Err(unparsable());
    }
    let line_no: usize = line_no
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(unparsable)?;
    let column: usize = column
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(unparsable)?;
    // 行・列ともに 1 始まり
    if line_no == 0 || column == 0 {
        return Err(unparsable());
    }

    Ok(MatchRecord {
        file: PathBuf::from(path),
        line: line_no,
        column: column - 1,
        matched_text: text.map_or("", |m| m.as_str()).to_string(),
    })
}

/// Records parsed from a whole output buffer, with the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOutput {
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<String>,
}

/// 検索出力をレコード単位に分割するイテレータ
///
/// With `--null` output the path runs up to the NUL byte and may itself
/// contain newlines; the location and text then run up to the next newline.
/// Without a NUL ahead, records are plain lines. Blank records are skipped.
#[derive(Debug, Clone)]
pub struct RawRecords<'a> {
    rest: &'a str,
}

impl<'a> Iterator for RawRecords<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest: &'a str = self.rest.trim_start_matches(['\n', '\r']);
            if rest.is_empty() {
                self.rest = rest;
                return None;
            }

            let end = match rest.find('\0') {
                Some(nul) => rest[nul..].find('\n').map_or(rest.len(), |offset| nul + offset),
                None => rest.find('\n').unwrap_or(rest.len()),
            };
            let record = &rest[..end];
            self.rest = rest.get(end + 1..).unwrap_or("");

            if !record.trim().is_empty() {
                return Some(record);
            }
        }
    }
}

/// 出力バッファをレコード文字列に分割
pub fn raw_records(output: &str) -> RawRecords<'_> {
    RawRecords { rest: output }
}

/// Lazily parse every record of `output`.
pub fn records(output: &str) -> impl Iterator<Item = Result<MatchRecord>> + '_ {
    raw_records(output).map(parse_line)
}

/// Parse a whole output buffer. Unparsable lines are logged and skipped.
pub fn parse_output(output: &str) -> ParsedOutput {
    let mut parsed = ParsedOutput::default();
    for result in records(output) {
        match result {
            Ok(record) => parsed.records.push(record),
            Err(NavError::UnparsableLine { line }) => {
                log::warn!("Skipping unparsable search output: {:?}", line);
                parsed.skipped.push(line);
            }
            Err(other) => log::warn!("Unexpected parse failure: {}", other),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced_line() {
        let record = parse_line("notes/todo.org 3:10:** Plan :work:urgent:").unwrap();
        assert_eq!(
            record,
            MatchRecord {
                file: PathBuf::from("notes/todo.org"),
                line: 3,
                column: 9,
                matched_text: "** Plan :work:urgent:".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_null_separated_line() {
        let record = parse_line("/notes/my notes/a 1:2:.org\u{0}12:1:* Heading 4:5: odd").unwrap();
        assert_eq!(record.file, PathBuf::from("/notes/my notes/a 1:2:.org"));
        assert_eq!(record.line, 12);
        assert_eq!(record.column, 0);
        assert_eq!(record.matched_text, "* Heading 4:5: odd");
    }

    #[test]
    fn test_path_with_spaces_and_colons_in_text() {
        let record = parse_line("/home/me/My Notes/plan.org 7:1:time 10:30: standup").unwrap();
        assert_eq!(record.file, PathBuf::from("/home/me/My Notes/plan.org"));
        assert_eq!(record.line, 7);
        assert_eq!(record.matched_text, "time 10:30: standup");
    }

    #[test]
    fn test_empty_matched_text_and_crlf() {
        let record = parse_line("a.org 1:1:\r").unwrap();
        assert_eq!(record.matched_text, "");
        assert_eq!(record.column, 0);
    }

    #[test]
    fn test_rejects_malformed_lines() {
        for bad in ["", "no location here", "a.org 3:x:text", "a.org 0:1:text", "a.org 1:0:text", " 1:1:x", "\u{0}1:1:x"] {
            assert!(
                matches!(parse_line(bad), Err(NavError::UnparsableLine { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_property_column_is_shifted_by_one() {
        for (l, c) in [(1usize, 1usize), (2, 5), (100, 80), (65_535, 4_096)] {
            let line = format!("/n/x.org {}:{}:rest {}", l, c, l);
            let record = parse_line(&line).unwrap();
            assert_eq!(record.line, l);
            assert_eq!(record.column, c - 1);
            assert_eq!(record.matched_text, format!("rest {}", l));
        }
    }

    #[test]
    fn test_parse_output_skips_bad_lines() {
        // 末尾の行は stderr を取り込んだ場合のツールのメッセージ
        let output = "/n/a.org\u{0}1:1:* A\n\n/n/b.org\u{0}2:3:** B\ngarbage\n";
        let parsed = parse_output(output);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].file, PathBuf::from("/n/b.org"));
        assert_eq!(parsed.records[1].column, 2);
        assert_eq!(parsed.skipped, vec!["garbage".to_string()]);
    }

    #[test]
    fn test_null_separated_path_may_contain_newlines() {
        let output = "/n/plain.org\u{0}1:1:* First\n/n/a\nb.org\u{0}3:1:* Heading\n";
        let parsed = parse_output(output);
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].file, PathBuf::from("/n/plain.org"));
        assert_eq!(parsed.records[1].file, PathBuf::from("/n/a\nb.org"));
        assert_eq!(parsed.records[1].line, 3);
        assert_eq!(parsed.records[1].matched_text, "* Heading");
    }

    #[test]
    fn test_raw_records_split() {
        let spaced: Vec<&str> = raw_records("a.org 1:1:x\r\n\n  \nb.org 2:1:y").collect();
        assert_eq!(spaced, vec!["a.org 1:1:x\r", "b.org 2:1:y"]);

        let nul: Vec<&str> = raw_records("\n/n/x\ny.org\u{0}1:2:t\n").collect();
        assert_eq!(nul, vec!["/n/x\ny.org\u{0}1:2:t"]);
    }

    #[test]
    fn test_empty_output_has_no_records() {
        let parsed = parse_output("");
        assert!(parsed.records.is_empty());
        assert!(parsed.skipped.is_empty());
    }
}

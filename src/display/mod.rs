//! フォーマッターモジュール
//!
//! Each record kind has its own [`ResultFormatter`] implementation. The
//! query layer never formats anything; callers pick the formatter that
//! matches the records they asked for.

mod content_formatters;
mod file_formatters;
mod heading_formatters;
mod utils;

use crate::config::DisplayWidths;
use std::path::PathBuf;

pub use content_formatters::{BacklinkFormatter, MatchFormatter};
pub use file_formatters::{FileFormatter, LinkFormatter};
pub use heading_formatters::HeadingFormatter;
pub use utils::{detect_color_support, detect_terminal_width, truncate_path, truncate_text};

/// 色の定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Reset,
    Gray,
    Blue,
    Green,
    Yellow,
    Magenta,
    Cyan,
    White,
}

/// 色分け情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorInfo {
    /// 左側（タイトル・本文）の色
    pub content_color: Color,
    /// 右側（パス・位置）の色
    pub location_color: Color,
}

/// 表示用に整形された1件分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResult {
    /// 左側（見出し・本文・リンク）
    pub left_part: String,
    /// 右側（パス:行番号）
    pub right_part: String,
    pub color_info: ColorInfo,
}

/// Settings shared by every formatter.
#[derive(Debug, Clone)]
pub struct FormatContext {
    /// Paths are shown relative to this directory.
    pub root: PathBuf,
    pub widths: DisplayWidths,
    pub enable_colors: bool,
}

impl FormatContext {
    /// カラーなしのコンテキストを作成
    pub fn new(root: PathBuf, widths: DisplayWidths) -> Self {
        Self {
            root,
            widths,
            enable_colors: false,
        }
    }

    /// カラー出力の有無を設定
    pub fn with_colors(mut self, enable_colors: bool) -> Self {
        self.enable_colors = enable_colors;
        self
    }

    /// Shrink the title budget so a row fits into `terminal_width` columns.
    pub fn fit_to_terminal(mut self, terminal_width: usize) -> Self {
        let needed = self.widths.title + self.widths.location + 2;
        if needed > terminal_width {
            let overflow = needed - terminal_width;
            self.widths.title = self.widths.title.saturating_sub(overflow).max(10);
        }
        self
    }
}

/// 検索結果フォーマッターのトレイト
pub trait ResultFormatter<T> {
    fn context(&self) -> &FormatContext;

    fn format_result(&self, item: &T) -> FormattedResult;

    /// One output row: the left part padded to the title budget, then the right part.
    fn to_line(&self, formatted: &FormattedResult) -> String {
        let context = self.context();
        let left = if formatted.right_part.is_empty() {
            formatted.left_part.clone()
        } else {
            utils::pad_to(&formatted.left_part, context.widths.title)
        };
        if !context.enable_colors {
            return format!("{}  {}", left, formatted.right_part).trim_end().to_string();
        }
        format!(
            "{}  {}",
            utils::apply_color(&left, formatted.color_info.content_color),
            utils::apply_color(&formatted.right_part, formatted.color_info.location_color)
        )
    }

    fn render(&self, item: &T) -> String {
        self.to_line(&self.format_result(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Heading, MatchRecord};

    fn context() -> FormatContext {
        FormatContext::new(PathBuf::from("/notes"), DisplayWidths { title: 12, location: 16 })
    }

    #[test]
    fn test_render_pads_left_column() {
        let formatter = MatchFormatter::new(context());
        let record = MatchRecord {
            file: PathBuf::from("/notes/a.org"),
            line: 3,
            column: 0,
            matched_text: "hello".to_string(),
        };
        assert_eq!(formatter.render(&record), "hello         a.org:3");
    }

    #[test]
    fn test_colored_render_wraps_both_parts() {
        let formatter = HeadingFormatter::new(context().with_colors(true));
        let heading = Heading {
            file: PathBuf::from("/notes/a.org"),
            line: 1,
            level: 1,
            title: "Inbox".to_string(),
            tags: None,
        };
        let line = formatter.render(&heading);
        assert!(line.starts_with("\x1b["));
        assert!(line.contains("Inbox"));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_fit_to_terminal_shrinks_title() {
        let ctx = FormatContext::new(PathBuf::from("/"), DisplayWidths { title: 60, location: 40 })
            .fit_to_terminal(80);
        assert_eq!(ctx.widths.title, 38);
        assert_eq!(ctx.widths.location, 40);

        let roomy = FormatContext::new(PathBuf::from("/"), DisplayWidths { title: 60, location: 40 })
            .fit_to_terminal(200);
        assert_eq!(roomy.widths.title, 60);
    }
}

use super::utils::{clean_line, get_relative_path, truncate_path, truncate_text};
use super::{Color, ColorInfo, FormatContext, FormattedResult, ResultFormatter};
use crate::types::{Backlink, MatchRecord};
use std::path::Path;

fn location(context: &FormatContext, file: &Path, line: usize) -> String {
    let relative = get_relative_path(file, &context.root);
    truncate_path(&format!("{}:{}", relative, line), context.widths.location)
}

/// grep 結果用フォーマッター（本文 + パス:行番号）
pub struct MatchFormatter {
    context: FormatContext,
}

impl MatchFormatter {
    /// grep 結果用フォーマッターを作成
    pub fn new(context: FormatContext) -> Self {
        Self { context }
    }
}

impl ResultFormatter<MatchRecord> for MatchFormatter {
    fn context(&self) -> &FormatContext {
        &self.context
    }

    fn format_result(&self, record: &MatchRecord) -> FormattedResult {
        FormattedResult {
            left_part: truncate_text(&clean_line(&record.matched_text), self.context.widths.title),
            right_part: location(&self.context, &record.file, record.line),
            color_info: ColorInfo {
                content_color: Color::White,
                location_color: Color::Gray,
            },
        }
    }
}

/// バックリンク用フォーマッター（リンクの説明 + 参照元）
pub struct BacklinkFormatter {
    context: FormatContext,
}

impl BacklinkFormatter {
    /// バックリンク用フォーマッターを作成
    pub fn new(context: FormatContext) -> Self {
        Self { context }
    }
}

impl ResultFormatter<Backlink> for BacklinkFormatter {
    fn context(&self) -> &FormatContext {
        &self.context
    }

    fn format_result(&self, backlink: &Backlink) -> FormattedResult {
        let text = backlink
            .link_description
            .clone()
            .unwrap_or_else(|| clean_line(&backlink.context));
        FormattedResult {
            left_part: truncate_text(&text, self.context.widths.title),
            right_part: location(&self.context, &backlink.file, backlink.line),
            color_info: ColorInfo {
                content_color: Color::Cyan,
                location_color: Color::Gray,
            },
        }
    }
}

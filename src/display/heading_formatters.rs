use super::utils::{get_relative_path, truncate_path, truncate_text};
use super::{Color, ColorInfo, FormatContext, FormattedResult, ResultFormatter};
use crate::types::Heading;

/// 見出し用フォーマッター（階層インデント + タイトル + タグ）
pub struct HeadingFormatter {
    context: FormatContext,
    show_tags: bool,
}

impl HeadingFormatter {
    /// 見出し用フォーマッターを作成（タグ表示あり）
    pub fn new(context: FormatContext) -> Self {
        Self {
            context,
            show_tags: true,
        }
    }

    /// タグを表示しない
    pub fn without_tags(mut self) -> Self {
        self.show_tags = false;
        self
    }
}

impl ResultFormatter<Heading> for HeadingFormatter {
    fn context(&self) -> &FormatContext {
        &self.context
    }

    fn format_result(&self, heading: &Heading) -> FormattedResult {
        let indent = "  ".repeat(heading.level.saturating_sub(1));
        let tags = match (&heading.tags, self.show_tags) {
            (Some(tags), true) => format!(" :{}:", tags.join(":")),
            _ => String::new(),
        };

        // タグは残してタイトル側を切り詰める
        let budget = self
            .context
            .widths
            .title
            .saturating_sub(indent.chars().count() + tags.chars().count());
        let left_part = if budget == 0 {
            truncate_text(&format!("{}{}{}", indent, heading.title, tags), self.context.widths.title)
        } else {
            format!("{}{}{}", indent, truncate_text(&heading.title, budget), tags)
        };

        let relative = get_relative_path(&heading.file, &self.context.root);
        FormattedResult {
            left_part,
            right_part: truncate_path(&format!("{}:{}", relative, heading.line), self.context.widths.location),
            color_info: ColorInfo {
                content_color: if heading.level == 1 { Color::Blue } else { Color::Green },
                location_color: Color::Gray,
            },
        }
    }
}

use super::utils::{get_relative_path, truncate_path, truncate_text};
use super::{Color, ColorInfo, FormatContext, FormattedResult, ResultFormatter};
use crate::types::{Link, LinkKind};
use std::path::{Path, PathBuf};

/// ファイル一覧用フォーマッター（ファイル名 + 親ディレクトリ）
pub struct FileFormatter {
    context: FormatContext,
}

impl FileFormatter {
    /// ファイル一覧用フォーマッターを作成
    pub fn new(context: FormatContext) -> Self {
        Self { context }
    }
}

impl ResultFormatter<PathBuf> for FileFormatter {
    fn context(&self) -> &FormatContext {
        &self.context
    }

    fn format_result(&self, path: &PathBuf) -> FormattedResult {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let relative = get_relative_path(path, &self.context.root);
        let parent_dir = Path::new(&relative)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "./".to_string());

        FormattedResult {
            left_part: truncate_text(&file_name, self.context.widths.title),
            right_part: truncate_path(&parent_dir, self.context.widths.location),
            color_info: ColorInfo {
                content_color: Color::White,
                location_color: Color::Blue,
            },
        }
    }
}

/// リンク用フォーマッター（説明 + リンク先）
pub struct LinkFormatter {
    context: FormatContext,
}

impl LinkFormatter {
    /// リンク用フォーマッターを作成
    pub fn new(context: FormatContext) -> Self {
        Self { context }
    }
}

impl ResultFormatter<Link> for LinkFormatter {
    fn context(&self) -> &FormatContext {
        &self.context
    }

    fn format_result(&self, link: &Link) -> FormattedResult {
        let raw = link.raw();
        let label = link.description.clone().unwrap_or_else(|| raw.clone());

        FormattedResult {
            left_part: truncate_text(&label, self.context.widths.title),
            right_part: truncate_text(&format!("[{}] {}", link.kind, raw), self.context.widths.location),
            color_info: ColorInfo {
                content_color: match link.kind {
                    LinkKind::File => Color::Green,
                    LinkKind::Url | LinkKind::Fuzzy => Color::Cyan,
                    LinkKind::Other => Color::Magenta,
                },
                location_color: Color::Gray,
            },
        }
    }
}

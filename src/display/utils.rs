use super::Color;
use std::path::Path;

/// カラーサポート検出
pub fn detect_color_support() -> bool {
    // NO_COLOR環境変数でカラー無効化
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // FORCE_COLOR環境変数でカラー強制有効化（テスト用）
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    is_stdout_tty() && std::env::var("TERM").is_ok_and(|term| term != "dumb")
}

/// 標準出力がTTYかどうか判定
pub fn is_stdout_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

/// Color enum を ANSI エスケープシーケンスに変換
pub fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Reset => "\x1b[0m",
        Color::Gray => "\x1b[90m",
        Color::Blue => "\x1b[34m",
        Color::Green => "\x1b[32m",
        Color::Yellow => "\x1b[33m",
        Color::Magenta => "\x1b[35m",
        Color::Cyan => "\x1b[36m",
        Color::White => "\x1b[37m",
    }
}

/// テキストを色付けしてリセットで閉じる
pub fn apply_color(text: &str, color: Color) -> String {
    format!("{}{}{}", color_to_ansi(color), text, color_to_ansi(Color::Reset))
}

/// ターミナル幅を検出（取得できなければ None）
pub fn detect_terminal_width() -> Option<usize> {
    crossterm::terminal::size().ok().map(|(width, _)| width as usize)
}

/// 相対パスを取得
pub fn get_relative_path(absolute_path: &Path, root: &Path) -> String {
    absolute_path
        .strip_prefix(root)
        .unwrap_or(absolute_path)
        .to_string_lossy()
        .to_string()
}

/// Shorten `text` to at most `max_width` characters, ending in `…` when cut.
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_width - 1).collect();
    truncated.push('…');
    truncated
}

/// パスを省略（先頭を削って末尾を残す）
pub fn truncate_path(path: &str, max_width: usize) -> String {
    let length = path.chars().count();
    if length <= max_width {
        return path.to_string();
    }
    if max_width <= 1 {
        return "…".chars().take(max_width).collect();
    }
    let tail: String = path.chars().skip(length - (max_width - 1)).collect();
    format!("…{}", tail)
}

/// Pad `text` with spaces to `width` characters.
pub fn pad_to(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - length))
    }
}

/// タブ展開と前後の空白除去
pub fn clean_line(line: &str) -> String {
    line.replace('\t', "    ").trim().to_string()
}

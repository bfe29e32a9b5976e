/// 見出し・タグ・バックリンク検索モジュール
pub mod backlinks;
pub mod headings;

pub use backlinks::{backlink_pattern, BacklinkQuery, BacklinkResolver};
pub use headings::HeadingIndexer;

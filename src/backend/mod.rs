//! 外部ツールバックエンドモジュール
//!
//! ripgrep（テキスト検索）と fd（ファイル列挙）を [`CommandRunner`] 経由で起動する。

pub mod fd;
pub mod ripgrep;
pub mod runner;

pub use fd::FileDiscoverer;
pub use ripgrep::RipgrepSearcher;
pub use runner::{CommandRunner, ProcessOutput, ProcessRunner};

#[cfg(test)]
pub use runner::MockCommandRunner;

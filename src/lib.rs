//! Navigation primitives over a corpus of outline notes.
//!
//! Every query shells out to ripgrep or fd, parses the line-oriented output
//! into typed records, and hands them back; nothing is indexed or cached.

pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod navigator;
pub mod parsers;
pub mod searchers;
pub mod types;

// 公開API
pub use config::{DisplayWidths, NavConfig, SearchRoot};
pub use error::{NavError, Result};
pub use navigator::Navigator;
pub use parsers::{extract_links, parse_line, LinkFilter, OrgDocument};
pub use types::*;

//! Parsers for search output and outline document structure.

pub mod heading;
pub mod links;
pub mod match_line;

pub use heading::{parse_tags, split_normalized, HeadingFilter, HeadingPattern};
pub use links::{extract_links, LinkFilter, OrgDocument};
pub use match_line::{parse_line, parse_output, raw_records, ParsedOutput, RawRecords};

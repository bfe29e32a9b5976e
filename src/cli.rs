//! Command-line surface
//!
//! Usage:
//!   notenav files                 - note files under the root
//!   notenav previews              - first line of every note
//!   notenav grep <pattern>        - regex search
//!   notenav headings [--tagged]   - outline headings (--no-tags hides tags)
//!   notenav tags                  - every heading tag
//!   notenav links <file>          - links in a note
//!   notenav backlinks <file>      - notes linking to a note

use crate::config::NavConfig;
use crate::display::{
    detect_color_support, detect_terminal_width, BacklinkFormatter, FileFormatter, FormatContext,
    HeadingFormatter, LinkFormatter, MatchFormatter, ResultFormatter,
};
use crate::navigator::Navigator;
use crate::parsers::LinkFilter;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "notenav", version, about = "Jump around outline notes with ripgrep and fd")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory to search (defaults to the configured root, then the current directory)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Note file extension; repeat for several (overrides the config)
    #[arg(long = "ext", global = true)]
    pub extensions: Vec<String>,

    /// Deadline for each external tool in milliseconds (0 disables it)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Print one JSON object per result
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List note files
    Files,
    /// Show the first line of every note
    Previews,
    /// Search note contents with a regular expression
    Grep { pattern: String },
    /// List outline headings
    Headings {
        /// Only headings with a trailing tag cluster
        #[arg(long)]
        tagged: bool,
        /// Only headings carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Hide the tag cluster in the listing
        #[arg(long)]
        no_tags: bool,
    },
    /// List every tag used on a heading
    Tags,
    /// List the links in a note
    Links {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = LinkKindArg::All)]
        kind: LinkKindArg,
        /// Show descriptions and link kinds
        #[arg(long)]
        details: bool,
    },
    /// List notes that link to a note
    Backlinks { file: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkKindArg {
    File,
    Url,
    All,
}

impl From<LinkKindArg> for LinkFilter {
    fn from(kind: LinkKindArg) -> Self {
        match kind {
            LinkKindArg::File => LinkFilter::File,
            LinkKindArg::Url => LinkFilter::Url,
            LinkKindArg::All => LinkFilter::All,
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then command-line flags.
    pub fn build_config(&self) -> Result<NavConfig> {
        let mut config = match &self.config {
            Some(path) => NavConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => NavConfig::default(),
        };
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions.iter().cloned());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout((ms > 0).then(|| Duration::from_millis(ms)));
        }
        config.validate()?;
        Ok(config)
    }
}

/// Run one subcommand, writing results to `out`. Returns the number of results.
pub async fn run(cli: &Cli, out: &mut impl Write) -> Result<usize> {
    let config = cli.build_config()?;
    let widths = config.widths;
    let navigator = Navigator::new(config)?;
    let dir = cli.dir.as_deref();

    let root = navigator.resolve_root(dir)?;
    let mut context = FormatContext::new(root, widths).with_colors(!cli.json && detect_color_support());
    if let Some(width) = detect_terminal_width() {
        context = context.fit_to_terminal(width);
    }

    let count = match &cli.command {
        Command::Files => {
            let files = navigator.files(dir).await?;
            emit(out, &files, &FileFormatter::new(context), cli.json)?
        }
        Command::Previews => {
            let previews = navigator.file_previews(dir).await?;
            emit(out, &previews, &MatchFormatter::new(context), cli.json)?
        }
        Command::Grep { pattern } => {
            let matches = navigator.grep(pattern, dir).await?;
            emit(out, &matches, &MatchFormatter::new(context), cli.json)?
        }
        Command::Headings { tagged, tag, no_tags } => {
            let headings = match tag {
                Some(tag) => navigator.headings_with_tag(tag, dir).await?,
                None if *tagged => navigator.tagged_headings(dir).await?,
                None => navigator.headings(dir).await?,
            };
            let formatter = if *no_tags {
                HeadingFormatter::new(context).without_tags()
            } else {
                HeadingFormatter::new(context)
            };
            emit(out, &headings, &formatter, cli.json)?
        }
        Command::Tags => {
            let tags = navigator.tags(dir).await?;
            emit_plain(out, &tags, cli.json)?
        }
        Command::Links { file, kind, details } => {
            if *details {
                let links = navigator.link_details(file).await?;
                emit(out, &links, &LinkFormatter::new(context), cli.json)?
            } else {
                let links = navigator.links(file, (*kind).into()).await?;
                emit_plain(out, &links, cli.json)?
            }
        }
        Command::Backlinks { file } => {
            let backlinks = navigator.backlinks(file, dir).await?;
            emit(out, &backlinks, &BacklinkFormatter::new(context), cli.json)?
        }
    };

    log::debug!("{} results", count);
    Ok(count)
}

fn emit<T, F>(out: &mut impl Write, items: &[T], formatter: &F, json: bool) -> Result<usize>
where
    T: Serialize,
    F: ResultFormatter<T>,
{
    for item in items {
        if json {
            writeln!(out, "{}", serde_json::to_string(item)?)?;
        } else {
            writeln!(out, "{}", formatter.render(item))?;
        }
    }
    Ok(items.len())
}

fn emit_plain(out: &mut impl Write, items: &[String], json: bool) -> Result<usize> {
    for item in items {
        if json {
            writeln!(out, "{}", serde_json::to_string(item)?)?;
        } else {
            writeln!(out, "{}", item)?;
        }
    }
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headings_flags() {
        let cli = Cli::try_parse_from(["notenav", "headings", "--tagged", "--dir", "/notes"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/notes")));
        match cli.command {
            Command::Headings { tagged, tag, no_tags } => {
                assert!(tagged);
                assert_eq!(tag, None);
                assert!(!no_tags);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_headings_without_tags() {
        let cli = Cli::try_parse_from(["notenav", "headings", "--tag", "work", "--no-tags"]).unwrap();
        match cli.command {
            Command::Headings { tagged, tag, no_tags } => {
                assert!(!tagged);
                assert_eq!(tag.as_deref(), Some("work"));
                assert!(no_tags);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_links_kind() {
        let cli = Cli::try_parse_from(["notenav", "links", "a.org", "--kind", "url"]).unwrap();
        match cli.command {
            Command::Links { file, kind, details } => {
                assert_eq!(file, PathBuf::from("a.org"));
                assert_eq!(LinkFilter::from(kind), LinkFilter::Url);
                assert!(!details);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from(["notenav", "--ext", "org", "--ext", "md", "--timeout-ms", "0", "tags"]).unwrap();
        let config = cli.build_config().unwrap();
        assert_eq!(config.extensions, vec!["org", "md"]);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notenav.json");
        std::fs::write(&path, r#"{"extensions": ["txt"], "widths": {"title": 30}}"#).unwrap();

        let cli = Cli::try_parse_from(["notenav", "--config", path.to_str().unwrap(), "files"]).unwrap();
        let config = cli.build_config().unwrap();
        assert_eq!(config.extensions, vec!["txt"]);
        assert_eq!(config.widths.title, 30);
        assert_eq!(config.widths.location, 40);
    }

    #[test]
    fn test_bad_config_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let cli = Cli::try_parse_from(["notenav", "--config", path.to_str().unwrap(), "files"]).unwrap();
        let err = cli.build_config().unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}

use notenav::{extract_links, LinkFilter, LinkKind, NavConfig, Navigator, OrgDocument};
use std::fs;

const NOTE: &str = "\
#+title: Reading list

* Articles :reading:
- [[https://example.com/rust][Rust article]]
- [[fuzzy:https://example.com][Example]]
- <http://angle.example.org/page>
- plain https://plain.example.net/x, with punctuation.

* Files
- [[file:a/b.org][B]]
- [[file:projects/garden.org::*Tomatoes][Garden]]
- [[../shared/common.org]]
- [[*Articles][internal]]

#+begin_src org
[[file:inside-src.org]]
#+end_src
";

fn collect(filter: LinkFilter) -> Vec<String> {
    extract_links(&OrgDocument::from_text(NOTE), filter).collect()
}

#[test]
fn test_url_links() {
    assert_eq!(
        collect(LinkFilter::Url),
        vec![
            "https://example.com/rust",
            "https://example.com",
            "http://angle.example.org/page",
            "https://plain.example.net/x",
        ]
    );
}

#[test]
fn test_file_links() {
    assert_eq!(
        collect(LinkFilter::File),
        vec!["a/b.org", "projects/garden.org", "../shared/common.org"]
    );
}

#[test]
fn test_all_links_are_uninterpreted() {
    let all = collect(LinkFilter::All);
    assert_eq!(all.len(), 8);
    assert!(all.contains(&"fuzzy:https://example.com".to_string()));
    assert!(all.contains(&"file:projects/garden.org::*Tomatoes".to_string()));
    assert!(all.contains(&"*Articles".to_string()));
    assert!(!all.iter().any(|l| l.contains("inside-src")));
}

#[test]
fn test_typed_links() {
    let doc = OrgDocument::from_text(NOTE);
    let kinds: Vec<LinkKind> = doc.links().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LinkKind::Url,
            LinkKind::Fuzzy,
            LinkKind::Url,
            LinkKind::Url,
            LinkKind::File,
            LinkKind::File,
            LinkKind::File,
            LinkKind::Other,
        ]
    );
}

#[tokio::test]
async fn test_links_read_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("reading.org");
    fs::write(&path, NOTE)?;

    let nav = Navigator::new(NavConfig::default())?;
    let urls = nav.links(&path, LinkFilter::Url).await?;
    assert_eq!(urls.len(), 4);

    let details = nav.link_details(&path).await?;
    let garden = details
        .iter()
        .find(|l| l.target == "projects/garden.org")
        .expect("garden link");
    assert_eq!(garden.anchor.as_deref(), Some("*Tomatoes"));
    assert_eq!(garden.description.as_deref(), Some("Garden"));
    Ok(())
}

//! Writing search results and rendered pages

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use notion_export_core::{Page, PageRef};

/// Longest file stem we produce, in chars
const MAX_STEM_CHARS: usize = 120;

pub fn print_refs(refs: &[PageRef], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(refs)?);
        return Ok(());
    }
    for page in refs {
        println!("{}\t{}", page.id, page.title);
    }
    Ok(())
}

/// Print pages to stdout, or write them under `dir`
///
/// `json` only applies to stdout; the CLI rejects it together with `--out`.
pub async fn emit_pages(pages: &[Page], dir: Option<&Path>, json: bool) -> Result<()> {
    match dir {
        Some(dir) => {
            let written = write_pages(pages, dir).await?;
            info!("Wrote {} page(s) to {}", written.len(), dir.display());
        }
        None if json => println!("{}", serde_json::to_string_pretty(pages)?),
        None => {
            for page in pages {
                println!("{}", page.content);
            }
        }
    }
    Ok(())
}

/// File name for a page: sanitized title, falling back to the id
pub fn file_name(page: &Page) -> String {
    let stem: String = page
        .title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_STEM_CHARS)
        .collect();
    let stem = stem.trim().trim_start_matches('.');

    if stem.is_empty() {
        format!("{}.md", page.id)
    } else {
        format!("{stem}.md")
    }
}

/// Write each page to `<dir>/<file_name>`, creating `dir` if needed
///
/// Two pages that sanitize to the same name get the page id appended.
pub async fn write_pages(pages: &[Page], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut path = dir.join(file_name(page));
        if written.contains(&path) {
            let name = file_name(page);
            let stem = name.trim_end_matches(".md");
            path = dir.join(format!("{stem} {}.md", page.id));
        }

        fs::write(&path, &page.content)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, title: &str, content: &str) -> Page {
        Page {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_file_name_sanitizes() {
        assert_eq!(file_name(&page("p1", "Q3/Q4: plan?", "")), "Q3_Q4_ plan_.md");
        assert_eq!(file_name(&page("p1", "  ", "")), "p1.md");
        assert_eq!(file_name(&page("p1", ".hidden", "")), "hidden.md");
    }

    #[tokio::test]
    async fn test_write_pages_disambiguates_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let pages = [
            page("p1", "Notes", "# one\n"),
            page("p2", "Notes", "# two\n"),
        ];

        let written = write_pages(&pages, dir.path()).await.unwrap();
        assert_eq!(written[0], dir.path().join("Notes.md"));
        assert_eq!(written[1], dir.path().join("Notes p2.md"));
        assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), "# two\n");
    }
}

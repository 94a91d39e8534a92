//! Title search over the workspace

use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::ExportError;
use crate::gateway::{ContentGateway, SearchHit};
use crate::pages::PageRef;

/// Id and title for a search hit; title is "" when none can be resolved
fn id_and_title(hit: &SearchHit) -> Option<(&str, &str)> {
    match hit {
        SearchHit::Page(page) => Some((page.id.as_str(), page.title())),
        SearchHit::Database(database) => Some((database.id.as_str(), database.title())),
        SearchHit::Block(block) => Some((block.id.as_str(), "")),
        SearchHit::Unknown => None,
    }
}

/// Normalize a hit into a [`PageRef`], dropping untitled entries
pub fn page_ref(hit: &SearchHit) -> Option<PageRef> {
    id_and_title(hit)
        .filter(|(_, title)| !title.is_empty())
        .map(|(id, title)| PageRef::new(id, title))
}

/// Pages whose title contains `title_contains`, in result order, de-duplicated
pub async fn list_pages(
    gateway: &dyn ContentGateway,
    title_contains: &str,
) -> Result<Vec<PageRef>, ExportError> {
    let hits = gateway
        .search(title_contains)
        .await
        .map_err(|source| ExportError::Search {
            query: title_contains.to_string(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for hit in &hits {
        match page_ref(hit) {
            Some(page) if seen.insert(page.id.clone()) => result.push(page),
            Some(page) => debug!("dropping duplicate search hit {}", page.id),
            None => debug!("dropping untitled search hit"),
        }
    }

    info!(
        "search {:?}: {} hit(s), {} page(s)",
        title_contains,
        hits.len(),
        result.len()
    );
    Ok(result)
}

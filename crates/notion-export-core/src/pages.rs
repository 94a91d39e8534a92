//! Page assembly: selected pages in, rendered pages out

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ExportError;
use crate::gateway::{ContentGateway, PageObject};
use crate::walker::TreeWalker;

/// Identifies a page to export
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    pub id: String,
    pub title: String,
}

impl PageRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Renders pages one after another through a [`TreeWalker`]
pub struct PageAssembler<'a> {
    gateway: &'a dyn ContentGateway,
    walker: TreeWalker<'a>,
}

impl<'a> PageAssembler<'a> {
    pub fn new(gateway: &'a dyn ContentGateway) -> Self {
        Self {
            gateway,
            walker: TreeWalker::new(gateway),
        }
    }

    /// Render every page in order; the first failure aborts the batch
    pub async fn assemble(&self, pages: &[PageRef]) -> Result<Vec<Page>, ExportError> {
        info!("Assembling {} page(s)", pages.len());
        let mut result = Vec::with_capacity(pages.len());
        for page in pages {
            result.push(self.assemble_page(page).await?);
        }
        Ok(result)
    }

    /// Render a single page, keeping the caller's title
    pub async fn assemble_page(&self, page: &PageRef) -> Result<Page, ExportError> {
        let content = self.walker.walk_page(&page.id).await.map_err(|e| {
            error!("get page {} error: {}", page.id, e);
            ExportError::Page {
                id: page.id.clone(),
                source: Box::new(e),
            }
        })?;

        Ok(Page {
            id: page.id.clone(),
            title: page.title.clone(),
            content,
        })
    }

    /// Raw page metadata for each ref, in order
    pub async fn page_objects(&self, pages: &[PageRef]) -> Result<Vec<PageObject>, ExportError> {
        let mut result = Vec::with_capacity(pages.len());
        for page in pages {
            let object = self.gateway.get_page(&page.id).await.map_err(|source| {
                ExportError::PageObject {
                    id: page.id.clone(),
                    source,
                }
            })?;
            result.push(object);
        }
        Ok(result)
    }
}

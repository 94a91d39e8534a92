//! Remote content gateway
//!
//! The rest of the crate talks to the content service only through
//! [`ContentGateway`]. [`NotionHttpGateway`] is the production implementation;
//! tests use an in-memory mock.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

use crate::error::GatewayError;

pub use http::NotionHttpGateway;
pub use types::{
    Block, BlockKind, ChildrenPage, DatabaseObject, ImageResource, PageObject, Parent, RichText,
    SearchHit,
};

/// Capability surface of the remote content service
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Title substring search over pages, databases and blocks
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GatewayError>;

    async fn get_page(&self, id: &str) -> Result<PageObject, GatewayError>;

    async fn get_block(&self, id: &str) -> Result<Block, GatewayError>;

    /// One page of children; pass the returned cursor back until it is `None`
    async fn get_children(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, GatewayError>;

    /// Dedicated image lookup returning a signed, time-limited url
    ///
    /// Kept separate from [`get_block`](Self::get_block): the generic block
    /// payload does not reliably carry the signed url.
    async fn get_image_resource(&self, block_id: &str) -> Result<ImageResource, GatewayError>;
}

/// Fetch every child of `id`, following cursors until exhausted
pub async fn drain_children(
    gateway: &dyn ContentGateway,
    id: &str,
) -> Result<Vec<Block>, GatewayError> {
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = gateway.get_children(id, cursor.as_deref()).await?;
        pages += 1;
        children.extend(page.results);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(
        "drained {} children of {} in {} page(s)",
        children.len(),
        id,
        pages
    );
    Ok(children)
}

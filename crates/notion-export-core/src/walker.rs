//! Recursive block-tree traversal
//!
//! Pre-order, depth-first: a block's own fragment, then each child subtree in
//! the order the children listing returns them. Errors are asymmetric:
//! failing to fetch the requested block (or list its children) fails the
//! call, while a failing child subtree is logged and contributes nothing.

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::gateway::{drain_children, BlockKind, ContentGateway};
use crate::render::{BlockRenderer, GatewaySiblings};

/// Expands a block id into the markdown of its whole subtree
pub struct TreeWalker<'a> {
    gateway: &'a dyn ContentGateway,
    siblings: GatewaySiblings<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(gateway: &'a dyn ContentGateway) -> Self {
        Self {
            gateway,
            siblings: GatewaySiblings::new(gateway),
        }
    }

    fn renderer(&self) -> BlockRenderer<'_> {
        BlockRenderer::new(self.gateway, &self.siblings)
    }

    /// Markdown for `id` and all of its descendants
    pub fn walk<'s>(&'s self, id: &'s str) -> BoxFuture<'s, Result<String, ExportError>> {
        async move {
            let block = self.gateway.get_block(id).await.map_err(|source| {
                warn!("get block {} error: {}", id, source);
                ExportError::Block {
                    id: id.to_string(),
                    source,
                }
            })?;

            if block.kind == BlockKind::Unsupported {
                warn!("skipping unsupported block {}", id);
                return Ok(String::new());
            }
            debug!("block {} ({})", id, block.kind.name());

            let mut out = self.renderer().render(&block).await;

            // Table rows were already fetched and rendered by the table itself
            if !block.has_children || matches!(block.kind, BlockKind::Table(_)) {
                return Ok(out);
            }

            let children = drain_children(self.gateway, id).await.map_err(|source| {
                warn!("get block's children {} error: {}", id, source);
                ExportError::Children {
                    id: id.to_string(),
                    source,
                }
            })?;

            for child in &children {
                match self.walk(&child.id).await {
                    Ok(fragment) => out.push_str(&fragment),
                    Err(e) => warn!("get block child {} error: {}", child.id, e),
                }
            }

            Ok(out)
        }
        .boxed()
    }

    /// Walk a page root; page ids are block ids for the children endpoint
    pub async fn walk_page(&self, page_id: &str) -> Result<String, ExportError> {
        info!("Rendering page {}", page_id);
        let content = self.walk(page_id).await?;
        info!("Rendered page {} ({} bytes)", page_id, content.len());
        Ok(content)
    }
}

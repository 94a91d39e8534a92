//! Ordinal numbering for numbered list items
//!
//! A numbered item's number depends on its siblings, not the block itself:
//! it is one more than the count of numbered items that precede it under the
//! same parent. Other sibling kinds do not reset or advance the count.

use async_trait::async_trait;
use tracing::warn;

use crate::error::GatewayError;
use crate::gateway::{drain_children, Block, ContentGateway};

/// Read access to a block's siblings
#[async_trait]
pub trait SiblingContext: Send + Sync {
    /// All children of `parent_id`, in document order
    async fn children_of(&self, parent_id: &str) -> Result<Vec<Block>, GatewayError>;
}

/// Sibling lookup through the gateway's paginated children listing
pub struct GatewaySiblings<'a> {
    gateway: &'a dyn ContentGateway,
}

impl<'a> GatewaySiblings<'a> {
    pub fn new(gateway: &'a dyn ContentGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<'a> SiblingContext for GatewaySiblings<'a> {
    async fn children_of(&self, parent_id: &str) -> Result<Vec<Block>, GatewayError> {
        drain_children(self.gateway, parent_id).await
    }
}

/// 1-based position of `target_id` among the numbered items in `siblings`
///
/// Returns `None` when the target is not in the list.
pub fn ordinal_among(siblings: &[Block], target_id: &str) -> Option<usize> {
    let mut preceding = 0;
    for sibling in siblings {
        if sibling.id == target_id {
            return Some(preceding + 1);
        }
        if sibling.is_numbered_list_item() {
            preceding += 1;
        }
    }
    None
}

/// Ordinal for `block`, failing open to 1
pub async fn ordinal(siblings: &dyn SiblingContext, block: &Block) -> usize {
    let Some(parent_id) = block.parent_id() else {
        warn!("numbered item {} has no parent, numbering as 1", block.id);
        return 1;
    };

    match siblings.children_of(parent_id).await {
        Ok(children) => ordinal_among(&children, &block.id).unwrap_or_else(|| {
            warn!(
                "numbered item {} not found under parent {}, numbering as 1",
                block.id, parent_id
            );
            1
        }),
        Err(e) => {
            warn!(
                "failed to list siblings of {} under {}: {}",
                block.id, parent_id, e
            );
            1
        }
    }
}

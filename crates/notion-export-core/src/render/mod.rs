//! Block-to-markdown rendering
//!
//! One block in, one markdown fragment out. Most kinds are pure formatting;
//! three reach back out:
//! - numbered list items ask a [`SiblingContext`] for their ordinal
//! - tables fetch their rows through the gateway
//! - images resolve their signed url through the dedicated image lookup
//!
//! Nothing here returns an error. Kinds without a rule render as "", and
//! fetch failures render as the error message.

pub mod numbering;
pub mod table;

use tracing::{debug, warn};

use crate::gateway::types::{plain_text, MediaPayload, TablePayload};
use crate::gateway::{drain_children, Block, BlockKind, ContentGateway};

pub use numbering::{ordinal, ordinal_among, GatewaySiblings, SiblingContext};

/// Renders single blocks against a gateway and a sibling context
pub struct BlockRenderer<'a> {
    gateway: &'a dyn ContentGateway,
    siblings: &'a dyn SiblingContext,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(gateway: &'a dyn ContentGateway, siblings: &'a dyn SiblingContext) -> Self {
        Self { gateway, siblings }
    }

    /// Markdown for `block` alone (children are the walker's job)
    pub async fn render(&self, block: &Block) -> String {
        match &block.kind {
            BlockKind::NumberedListItem(text) => {
                let n = ordinal(self.siblings, block).await;
                format!("{}. {}\n", n, text.text())
            }
            BlockKind::Table(table) => self.render_table(block, table).await,
            BlockKind::Image(_) => self.render_image(block).await,
            _ => render_static(block),
        }
    }

    async fn render_table(&self, block: &Block, table: &TablePayload) -> String {
        match drain_children(self.gateway, &block.id).await {
            Ok(rows) => table::render_rows(&rows, table.has_column_header),
            Err(e) => {
                warn!("failed to fetch rows of table {}: {}", block.id, e);
                e.to_string()
            }
        }
    }

    async fn render_image(&self, block: &Block) -> String {
        match self.gateway.get_image_resource(&block.id).await {
            Ok(resource) => format!("![]({})\n", resource.url),
            Err(e) => {
                warn!("failed to resolve image {}: {}", block.id, e);
                e.to_string()
            }
        }
    }
}

/// Kinds whose markdown depends on nothing but the block itself
pub fn render_static(block: &Block) -> String {
    match &block.kind {
        BlockKind::Heading1(t) => format!("# {}\n", t.text()),
        BlockKind::Heading2(t) => format!("## {}\n", t.text()),
        BlockKind::Heading3(t) => format!("### {}\n", t.text()),
        BlockKind::Paragraph(t) => format!("{}\n", t.text()),
        BlockKind::BulletedListItem(t) => format!("- {}\n", t.text()),
        BlockKind::Toggle(t) => format!("::: toggle\n{}\n:::\n", t.text()),
        BlockKind::Quote(t) => format!("> {}\n", t.text()),
        BlockKind::Code(t) => format!("```\n{}\n```\n", t.text()),
        BlockKind::Callout(t) => format!("⚠️ {}\n", t.text()),
        BlockKind::ToDo(todo) => {
            let mark = if todo.checked { "x" } else { " " };
            format!("- [{}] {}\n", mark, plain_text(&todo.rich_text))
        }
        BlockKind::TableRow(row) => table::render_row(row),
        BlockKind::Divider => "---\n".to_string(),
        BlockKind::Video(media) => render_video(media),
        BlockKind::Embed(embed) => format!("{{{}}}\n", embed.url),
        BlockKind::NumberedListItem(_)
        | BlockKind::Table(_)
        | BlockKind::Image(_)
        | BlockKind::Unsupported
        | BlockKind::Other(_) => {
            debug!("no static markdown for block {} ({})", block.id, block.kind.name());
            String::new()
        }
    }
}

fn render_video(media: &MediaPayload) -> String {
    format!(
        "<iframe src=\"{}\" width=\"300\" height=\"200\" frameborder=\"0\" allowfullscreen></iframe>\n",
        media.url()
    )
}

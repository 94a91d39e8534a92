//! notion-export core library
//!
//! Fetches Notion pages block by block and renders them to markdown.
//!
//! - `gateway` - the [`ContentGateway`] trait, wire types, and the HTTP implementation
//! - `render` - block-to-markdown rules, list numbering, tables
//! - `walker` - recursive, paginated tree traversal
//! - `pages` - batch page assembly
//! - `search` - title search normalized to [`PageRef`]s
//! - `config` - token, endpoint and paging settings

pub mod config;
pub mod error;
pub mod gateway;
pub mod pages;
pub mod render;
pub mod search;
pub mod walker;

pub use config::ExportConfig;
pub use error::{ExportError, GatewayError};
pub use gateway::{drain_children, Block, BlockKind, ContentGateway, NotionHttpGateway};
pub use pages::{Page, PageAssembler, PageRef};
pub use render::{BlockRenderer, GatewaySiblings, SiblingContext};
pub use search::list_pages;
pub use walker::TreeWalker;

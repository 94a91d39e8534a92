//! Wire types for blocks, pages, databases and list responses
//!
//! Blocks carry their payload under a key named after the block type, e.g.
//! `{"type": "paragraph", "paragraph": {"rich_text": [...]}}`. Decoding goes
//! through [`RawBlock`] so any type without a markdown rule still produces a
//! usable [`Block`] instead of a decode error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A span of styled text, reduced to its plain text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
        }
    }
}

/// Concatenate the plain text of every run
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}

/// Plain text of the first run only (table cells, titles)
pub fn first_plain_text(runs: &[RichText]) -> &str {
    runs.first().map(|r| r.plain_text.as_str()).unwrap_or("")
}

/// Where a block or page hangs in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: String },
    BlockId { block_id: String },
    DatabaseId { database_id: String },
    #[serde(other)]
    Other,
}

impl Parent {
    /// Id whose children listing contains this object, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Parent::PageId { page_id } => Some(page_id.as_str()),
            Parent::BlockId { block_id } => Some(block_id.as_str()),
            Parent::DatabaseId { database_id } => Some(database_id.as_str()),
            Parent::Other => None,
        }
    }
}

/// Payload shared by every text-bearing block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextPayload {
    pub fn text(&self) -> String {
        plain_text(&self.rich_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToDoPayload {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableRowPayload {
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileUrl {
    #[serde(default)]
    pub url: String,
}

/// Media reference: either hosted by the service or an external link
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaPayload {
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub file: Option<FileUrl>,
}

impl MediaPayload {
    pub fn url(&self) -> &str {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|f| f.url.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbedPayload {
    #[serde(default)]
    pub url: String,
}

/// Every block type we know how to render
///
/// `Unsupported` is the service's own marker for content it cannot expose
/// through the API. `Other` is any type with no markdown rule here
/// (`child_page`, `column_list`, `synced_block`, ...); it renders nothing but
/// its children are still walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading1(TextPayload),
    Heading2(TextPayload),
    Heading3(TextPayload),
    Paragraph(TextPayload),
    BulletedListItem(TextPayload),
    NumberedListItem(TextPayload),
    Toggle(TextPayload),
    Quote(TextPayload),
    Code(TextPayload),
    Callout(TextPayload),
    ToDo(ToDoPayload),
    Table(TablePayload),
    TableRow(TableRowPayload),
    Divider,
    Video(MediaPayload),
    Embed(EmbedPayload),
    Image(MediaPayload),
    Unsupported,
    Other(String),
}

impl BlockKind {
    /// Type name as the service spells it
    pub fn name(&self) -> &str {
        match self {
            BlockKind::Heading1(_) => "heading_1",
            BlockKind::Heading2(_) => "heading_2",
            BlockKind::Heading3(_) => "heading_3",
            BlockKind::Paragraph(_) => "paragraph",
            BlockKind::BulletedListItem(_) => "bulleted_list_item",
            BlockKind::NumberedListItem(_) => "numbered_list_item",
            BlockKind::Toggle(_) => "toggle",
            BlockKind::Quote(_) => "quote",
            BlockKind::Code(_) => "code",
            BlockKind::Callout(_) => "callout",
            BlockKind::ToDo(_) => "to_do",
            BlockKind::Table(_) => "table",
            BlockKind::TableRow(_) => "table_row",
            BlockKind::Divider => "divider",
            BlockKind::Video(_) => "video",
            BlockKind::Embed(_) => "embed",
            BlockKind::Image(_) => "image",
            BlockKind::Unsupported => "unsupported",
            BlockKind::Other(name) => name.as_str(),
        }
    }

    /// Decode the payload stored under the type key
    ///
    /// A payload that is missing or malformed falls back to its default so a
    /// single odd block never fails the page.
    fn decode(kind: &str, payload: Option<Value>) -> Self {
        fn payload_of<T: Default + for<'de> Deserialize<'de>>(payload: Option<Value>) -> T {
            payload
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default()
        }

        match kind {
            "heading_1" => BlockKind::Heading1(payload_of(payload)),
            "heading_2" => BlockKind::Heading2(payload_of(payload)),
            "heading_3" => BlockKind::Heading3(payload_of(payload)),
            "paragraph" => BlockKind::Paragraph(payload_of(payload)),
            "bulleted_list_item" => BlockKind::BulletedListItem(payload_of(payload)),
            "numbered_list_item" => BlockKind::NumberedListItem(payload_of(payload)),
            "toggle" => BlockKind::Toggle(payload_of(payload)),
            "quote" => BlockKind::Quote(payload_of(payload)),
            "code" => BlockKind::Code(payload_of(payload)),
            "callout" => BlockKind::Callout(payload_of(payload)),
            "to_do" => BlockKind::ToDo(payload_of(payload)),
            "table" => BlockKind::Table(payload_of(payload)),
            "table_row" => BlockKind::TableRow(payload_of(payload)),
            "divider" => BlockKind::Divider,
            "video" => BlockKind::Video(payload_of(payload)),
            "embed" => BlockKind::Embed(payload_of(payload)),
            "image" => BlockKind::Image(payload_of(payload)),
            "unsupported" => BlockKind::Unsupported,
            other => BlockKind::Other(other.to_string()),
        }
    }
}

/// Block as it arrives on the wire, before the payload is typed
#[derive(Debug, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(default)]
    has_children: bool,
    #[serde(default)]
    parent: Option<Parent>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub has_children: bool,
    pub parent: Option<Parent>,
    pub kind: BlockKind,
}

impl From<RawBlock> for Block {
    fn from(mut raw: RawBlock) -> Self {
        let payload = raw.rest.remove(&raw.kind);
        Self {
            kind: BlockKind::decode(&raw.kind, payload),
            id: raw.id,
            has_children: raw.has_children,
            parent: raw.parent,
        }
    }
}

impl Block {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().and_then(Parent::id)
    }

    pub fn is_numbered_list_item(&self) -> bool {
        matches!(self.kind, BlockKind::NumberedListItem(_))
    }
}

/// A page property; only titles matter here
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    #[serde(other)]
    Other,
}

/// Page metadata from the page endpoint or a search hit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl PageObject {
    /// Title from the `title` property, else the `Name` property
    ///
    /// Database rows usually name their title column `Name`; standalone
    /// pages use `title`. Missing or empty titles resolve to "".
    pub fn title(&self) -> &str {
        ["title", "Name"]
            .iter()
            .find_map(|key| match self.properties.get(*key) {
                Some(PropertyValue::Title { title }) => Some(first_plain_text(title)),
                _ => None,
            })
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

impl DatabaseObject {
    pub fn title(&self) -> &str {
        first_plain_text(&self.title)
    }
}

/// One entry of a search response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum SearchHit {
    Page(PageObject),
    Database(DatabaseObject),
    Block(Block),
    #[serde(other)]
    Unknown,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> ListResponse<T> {
    /// Cursor for the next call, `None` once the listing is exhausted
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// A page of block children
#[derive(Debug, Clone, Default)]
pub struct ChildrenPage {
    pub results: Vec<Block>,
    pub next_cursor: Option<String>,
}

impl From<ListResponse<Block>> for ChildrenPage {
    fn from(list: ListResponse<Block>) -> Self {
        let next_cursor = list.continuation().map(str::to_string);
        Self {
            results: list.results,
            next_cursor,
        }
    }
}

/// Resolved, time-limited media url for an image block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub url: String,
}

/// Shape returned by the dedicated image lookup: `{image: {file: {url}}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ImageResourceBlock {
    #[serde(default)]
    pub image: MediaPayload,
}

impl ImageResourceBlock {
    /// Hosted file url first; external images have no signed url
    pub fn url(&self) -> Option<&str> {
        self.image
            .file
            .as_ref()
            .or(self.image.external.as_ref())
            .map(|f| f.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_paragraph() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "parent": {"type": "page_id", "page_id": "p1"},
            "paragraph": {
                "rich_text": [{"plain_text": "Hello, "}, {"plain_text": "world"}],
                "color": "default"
            }
        }))
        .unwrap();

        assert_eq!(block.id, "b1");
        assert_eq!(block.parent_id(), Some("p1"));
        match &block.kind {
            BlockKind::Paragraph(p) => assert_eq!(p.text(), "Hello, world"),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_type_as_other() {
        let block: Block = serde_json::from_value(json!({
            "id": "b2",
            "type": "child_page",
            "has_children": true,
            "child_page": {"title": "Sub"}
        }))
        .unwrap();

        assert_eq!(block.kind, BlockKind::Other("child_page".to_string()));
        assert_eq!(block.kind.name(), "child_page");
        assert!(block.has_children);
        assert_eq!(block.parent_id(), None);
    }

    #[test]
    fn test_decode_unsupported_marker() {
        let block: Block = serde_json::from_value(json!({
            "id": "b3",
            "type": "unsupported",
            "unsupported": {}
        }))
        .unwrap();
        assert_eq!(block.kind, BlockKind::Unsupported);
    }

    #[test]
    fn test_malformed_payload_falls_back_to_default() {
        let block: Block = serde_json::from_value(json!({
            "id": "b4",
            "type": "to_do",
            "to_do": {"checked": "yes"}
        }))
        .unwrap();
        assert_eq!(block.kind, BlockKind::ToDo(ToDoPayload::default()));
    }

    #[test]
    fn test_page_title_prefers_title_then_name() {
        let page: PageObject = serde_json::from_value(json!({
            "id": "p1",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Row name"}]},
                "Status": {"type": "select", "select": {"name": "Done"}}
            }
        }))
        .unwrap();
        assert_eq!(page.title(), "Row name");

        let page: PageObject = serde_json::from_value(json!({
            "id": "p2",
            "properties": {
                "title": {"type": "title", "title": [{"plain_text": "Top"}, {"plain_text": " level"}]}
            }
        }))
        .unwrap();
        assert_eq!(page.title(), "Top");

        let page: PageObject = serde_json::from_value(json!({"id": "p3"})).unwrap();
        assert_eq!(page.title(), "");
    }

    #[test]
    fn test_search_hits_by_object() {
        let hits: Vec<SearchHit> = serde_json::from_value(json!([
            {"object": "page", "id": "p1", "properties": {}},
            {"object": "database", "id": "d1", "title": [{"plain_text": "Trips"}]},
            {"object": "block", "id": "b1", "type": "divider", "divider": {}},
            {"object": "user", "id": "u1"}
        ]))
        .unwrap();

        assert!(matches!(&hits[0], SearchHit::Page(p) if p.id == "p1"));
        assert!(matches!(&hits[1], SearchHit::Database(d) if d.title() == "Trips"));
        assert!(matches!(&hits[2], SearchHit::Block(b) if b.kind == BlockKind::Divider));
        assert_eq!(hits[3], SearchHit::Unknown);
    }

    #[test]
    fn test_children_page_drops_cursor_without_more() {
        let list: ListResponse<Block> = serde_json::from_value(json!({
            "results": [],
            "next_cursor": "stale",
            "has_more": false
        }))
        .unwrap();
        assert!(ChildrenPage::from(list).next_cursor.is_none());
    }

    #[test]
    fn test_image_resource_url() {
        let resource: ImageResourceBlock = serde_json::from_value(json!({
            "object": "block",
            "id": "img",
            "type": "image",
            "image": {"caption": [], "type": "file", "file": {"url": "https://x/y.png", "expiry_time": "2026-01-01T00:00:00.000Z"}}
        }))
        .unwrap();
        assert_eq!(resource.url(), Some("https://x/y.png"));

        let empty: ImageResourceBlock = serde_json::from_value(json!({"id": "img"})).unwrap();
        assert_eq!(empty.url(), None);
    }
}

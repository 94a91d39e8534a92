//! In-memory gateway for tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::types::{Block, ChildrenPage, ImageResource, PageObject, SearchHit};
use super::ContentGateway;
use crate::error::GatewayError;

/// Serves blocks and paginated children from maps
pub struct MockGateway {
    blocks: HashMap<String, Block>,
    children: HashMap<String, Vec<Block>>,
    pages: HashMap<String, PageObject>,
    images: HashMap<String, String>,
    search_hits: Vec<SearchHit>,
    failing_blocks: HashSet<String>,
    failing_children: HashSet<String>,
    page_size: usize,
    children_calls: Mutex<HashMap<String, usize>>,
    searches: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            blocks: HashMap::new(),
            children: HashMap::new(),
            pages: HashMap::new(),
            images: HashMap::new(),
            search_hits: Vec::new(),
            failing_blocks: HashSet::new(),
            failing_children: HashSet::new(),
            page_size: 100,
            children_calls: Mutex::new(HashMap::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.insert(block.id.clone(), block);
        self
    }

    /// Register children of `parent`; each child becomes fetchable by id
    /// and the parent (if registered) is flagged as having children.
    pub fn with_children(mut self, parent: &str, children: Vec<Block>) -> Self {
        for child in &children {
            self.blocks.insert(child.id.clone(), child.clone());
        }
        if let Some(block) = self.blocks.get_mut(parent) {
            block.has_children = true;
        }
        self.children.insert(parent.to_string(), children);
        self
    }

    pub fn with_page(mut self, page: PageObject) -> Self {
        self.pages.insert(page.id.clone(), page);
        self
    }

    pub fn with_image(mut self, block_id: &str, url: &str) -> Self {
        self.images.insert(block_id.to_string(), url.to_string());
        self
    }

    pub fn with_search_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.search_hits = hits;
        self
    }

    pub fn with_failing_block(mut self, id: &str) -> Self {
        self.failing_blocks.insert(id.to_string());
        self
    }

    pub fn with_failing_children(mut self, id: &str) -> Self {
        self.failing_children.insert(id.to_string());
        self
    }

    pub fn children_calls(&self, id: &str) -> usize {
        let calls = self.children_calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(id).copied().unwrap_or(0)
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ContentGateway for MockGateway {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GatewayError> {
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        Ok(self.search_hits.clone())
    }

    async fn get_page(&self, id: &str) -> Result<PageObject, GatewayError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn get_block(&self, id: &str) -> Result<Block, GatewayError> {
        if self.failing_blocks.contains(id) {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        self.blocks
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn get_children(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, GatewayError> {
        *self
            .children_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(id.to_string())
            .or_insert(0) += 1;

        if self.failing_children.contains(id) {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        let all = self.children.get(id).map(Vec::as_slice).unwrap_or(&[]);

        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let results = all.get(start..end).unwrap_or(&[]).to_vec();
        let next_cursor = (end < all.len()).then(|| end.to_string());

        Ok(ChildrenPage {
            results,
            next_cursor,
        })
    }

    async fn get_image_resource(&self, block_id: &str) -> Result<ImageResource, GatewayError> {
        match self.images.get(block_id) {
            Some(url) => Ok(ImageResource { url: url.clone() }),
            None => Err(GatewayError::Api {
                endpoint: format!("/blocks/{block_id}"),
                status: 403,
                code: "restricted_resource".to_string(),
                message: "Insufficient permissions for this endpoint.".to_string(),
            }),
        }
    }
}

/// Decode a block from its wire JSON
pub fn block(value: Value) -> Block {
    serde_json::from_value(value).expect("valid block json")
}

/// Text-bearing block of the given type under a block parent
pub fn text_block(kind: &str, id: &str, parent: &str, text: &str) -> Block {
    block(json!({
        "object": "block",
        "id": id,
        "type": kind,
        "has_children": false,
        "parent": {"type": "block_id", "block_id": parent},
        kind: {"rich_text": [{"plain_text": text}]}
    }))
}

pub fn paragraph(id: &str, parent: &str, text: &str) -> Block {
    text_block("paragraph", id, parent, text)
}

pub fn numbered(id: &str, parent: &str, text: &str) -> Block {
    text_block("numbered_list_item", id, parent, text)
}

pub fn table_row(id: &str, parent: &str, cells: &[&str]) -> Block {
    let cells: Vec<Value> = cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                json!([])
            } else {
                json!([{"plain_text": c}])
            }
        })
        .collect();
    block(json!({
        "id": id,
        "type": "table_row",
        "parent": {"type": "block_id", "block_id": parent},
        "table_row": {"cells": cells}
    }))
}

/// Page root as returned by the block endpoint (`child_page`)
pub fn page_root(id: &str, title: &str) -> Block {
    block(json!({
        "id": id,
        "type": "child_page",
        "has_children": false,
        "parent": {"type": "workspace", "workspace": true},
        "child_page": {"title": title}
    }))
}

pub fn page_object(id: &str, title_key: &str, title: &str) -> PageObject {
    serde_json::from_value(json!({
        "object": "page",
        "id": id,
        "properties": {
            title_key: {"id": "title", "type": "title", "title": [{"plain_text": title}]}
        }
    }))
    .expect("valid page json")
}

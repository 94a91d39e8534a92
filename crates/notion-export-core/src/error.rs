//! Error types for gateway calls and export operations

use thiserror::Error;

/// Errors returned by a [`ContentGateway`](crate::gateway::ContentGateway)
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout)
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{endpoint} returned {status} ({code}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        code: String,
        message: String,
    },

    /// The object does not exist or the integration cannot see it
    #[error("object {0} not found")]
    NotFound(String),

    /// The response body did not have the expected shape
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Image resource lookup succeeded but carried no usable url
    #[error("image block {0} has no file url")]
    MissingImageUrl(String),
}

/// Errors surfaced by the walker, the page assembler and search
///
/// Each variant carries the operation and target id so a batch failure
/// points at the exact object that broke it.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("get block {id} error: {source}")]
    Block {
        id: String,
        #[source]
        source: GatewayError,
    },

    #[error("get block's children {id} error: {source}")]
    Children {
        id: String,
        #[source]
        source: GatewayError,
    },

    #[error("get page {id} error: {source}")]
    Page {
        id: String,
        #[source]
        source: Box<ExportError>,
    },

    #[error("get page object {id} error: {source}")]
    PageObject {
        id: String,
        #[source]
        source: GatewayError,
    },

    #[error("search {query:?} error: {source}")]
    Search {
        query: String,
        #[source]
        source: GatewayError,
    },
}

impl ExportError {
    /// Id of the object the failing operation targeted (search has none)
    pub fn target_id(&self) -> Option<&str> {
        match self {
            ExportError::Block { id, .. }
            | ExportError::Children { id, .. }
            | ExportError::Page { id, .. }
            | ExportError::PageObject { id, .. } => Some(id.as_str()),
            ExportError::Search { .. } => None,
        }
    }
}

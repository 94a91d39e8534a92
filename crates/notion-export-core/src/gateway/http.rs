//! Notion REST API gateway

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{
    Block, ChildrenPage, ImageResource, ImageResourceBlock, ListResponse, PageObject, SearchHit,
};
use super::ContentGateway;
use crate::config::ExportConfig;
use crate::error::GatewayError;

/// Error body the API sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Map a non-2xx response to a gateway error
///
/// A 404 on an object lookup becomes `NotFound(target)`; everything else,
/// including a 404 with no target object, is an `Api` error carrying the
/// service's `code` and `message` when the body has them.
fn status_error(
    target: Option<&str>,
    endpoint: &str,
    status: StatusCode,
    text: String,
) -> GatewayError {
    if status == StatusCode::NOT_FOUND {
        if let Some(target) = target {
            return GatewayError::NotFound(target.to_string());
        }
    }

    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (String::new(), text),
    };
    GatewayError::Api {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        code,
        message,
    }
}

/// Request body for one page of search results
fn search_body(query: &str, page_size: u32, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "query": query,
        "page_size": page_size,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

/// Follow search cursors until the listing is exhausted
async fn drain_search<F, Fut>(
    query: &str,
    mut fetch_page: F,
) -> Result<Vec<SearchHit>, GatewayError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListResponse<SearchHit>, GatewayError>>,
{
    let mut hits = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch_page(cursor.take()).await?;
        debug!(
            "search {:?}: {} result(s), has_more={}",
            query,
            page.results.len(),
            page.has_more
        );

        let next = page.continuation().map(str::to_string);
        hits.extend(page.results);
        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(hits)
}

/// [`ContentGateway`] backed by `https://api.notion.com/v1`
pub struct NotionHttpGateway {
    client: reqwest::Client,
    config: ExportConfig,
}

impl NotionHttpGateway {
    pub fn new(config: ExportConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().user_agent("notion-export");
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|source| GatewayError::Transport {
            endpoint: config.api_base.clone(),
            source,
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Build an authenticated request for `path` with the given API version
    fn build_request(&self, method: Method, path: &str, version: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", version)
            .header("Content-Type", "application/json")
    }

    /// Send and map transport failures and error statuses
    ///
    /// `target` is the object id the request addresses, if any.
    async fn send(
        &self,
        target: Option<&str>,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        self.handle_error_response(target, endpoint, response).await
    }

    async fn handle_error_response(
        &self,
        target: Option<&str>,
        endpoint: &str,
        response: Response,
    ) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        warn!("Notion API error for '{}': {} {}", endpoint, status, text);
        Err(status_error(target, endpoint, status, text))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        what: &str,
        response: Response,
    ) -> Result<T, GatewayError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: what.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| GatewayError::Decode {
            what: what.to_string(),
            source,
        })
    }

    /// GET an object by id on the default API version
    async fn get_object<T: DeserializeOwned>(
        &self,
        id: &str,
        path: &str,
    ) -> Result<T, GatewayError> {
        let request = self.build_request(Method::GET, path, &self.config.notion_version);
        let response = self.send(Some(id), path, request).await?;
        self.decode(path, response).await
    }

    /// Children listing request; the cursor goes through as an opaque query value
    fn children_request(&self, id: &str, cursor: Option<&str>) -> RequestBuilder {
        let path = format!("/blocks/{id}/children");
        let mut request = self
            .build_request(Method::GET, &path, &self.config.notion_version)
            .query(&[("page_size", self.config.page_size)]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        request
    }

    async fn search_page(
        &self,
        query: &str,
        cursor: Option<String>,
    ) -> Result<ListResponse<SearchHit>, GatewayError> {
        let path = "/search";
        let body = search_body(query, self.config.page_size, cursor.as_deref());
        let request = self
            .build_request(Method::POST, path, &self.config.notion_version)
            .json(&body);
        let response = self.send(None, path, request).await?;
        self.decode("search results", response).await
    }
}

#[async_trait]
impl ContentGateway for NotionHttpGateway {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GatewayError> {
        drain_search(query, |cursor| self.search_page(query, cursor)).await
    }

    async fn get_page(&self, id: &str) -> Result<PageObject, GatewayError> {
        self.get_object(id, &format!("/pages/{id}")).await
    }

    async fn get_block(&self, id: &str) -> Result<Block, GatewayError> {
        self.get_object(id, &format!("/blocks/{id}")).await
    }

    async fn get_children(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage, GatewayError> {
        let endpoint = format!("/blocks/{id}/children");
        let request = self.children_request(id, cursor);
        let response = self.send(Some(id), &endpoint, request).await?;
        let list: ListResponse<Block> = self.decode(&endpoint, response).await?;
        Ok(list.into())
    }

    async fn get_image_resource(&self, block_id: &str) -> Result<ImageResource, GatewayError> {
        let path = format!("/blocks/{block_id}");
        let request = self.build_request(Method::GET, &path, &self.config.image_notion_version);
        let response = self.send(Some(block_id), &path, request).await?;
        let resource: ImageResourceBlock = self.decode("image block", response).await?;

        resource
            .url()
            .map(|url| ImageResource {
                url: url.to_string(),
            })
            .ok_or_else(|| GatewayError::MissingImageUrl(block_id.to_string()))
    }
}

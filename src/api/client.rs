// src/api/client.rs
//! HTTP transport for the Notion REST API.
//!
//! A thin wrapper around reqwest: it authenticates, sends one request per
//! call and hands back the parsed JSON body. Mapping into domain types
//! happens in the repository.

use super::NotionTransport;
use crate::constants::{
    ERROR_BODY_PREVIEW_LENGTH, NOTION_API_BASE_URL, NOTION_API_VERSION,
};
use crate::error::{AppError, NotionErrorCode};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde_json::{json, Value};

/// Log target for raw response bodies.
pub const WIRE_LOG_TARGET: &str = "scribeagent::wire";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
    debug: bool,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client that talks to `base_url` instead of the public API.
    pub fn with_base_url(api_key: &ApiKey, base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            debug: false,
        })
    }

    /// Enables logging of every response body at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).query(query).send().await?;
        self.read_body(response).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, AppError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        self.read_body(response).await
    }

    /// Turns a response into JSON, or into [`AppError::Remote`] for any
    /// non-2xx status.
    async fn read_body(&self, response: Response) -> Result<Value, AppError> {
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await?;

        if !status.is_success() {
            log::error!("Notion API error from {}: HTTP {}", url, status.as_u16());
            return Err(remote_error(status.as_u16(), text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", url, e);
            AppError::MalformedResponse(format!("{}: {}", e, preview(&text)))
        })?;

        if self.debug {
            log::debug!(
                target: WIRE_LOG_TARGET,
                "Response from {}:\n{}",
                url,
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| text.clone())
            );
        }

        Ok(body)
    }
}

/// Builds a `Remote` error from a failed response. Notion error bodies look
/// like `{"object": "error", "code": "...", "message": "..."}`; anything
/// else falls back to the HTTP status.
fn remote_error(status: u16, body: String) -> AppError {
    let parsed: Option<Value> = serde_json::from_str(&body).ok();
    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let code = field("code")
        .map(|code| NotionErrorCode::from_api_response(&code))
        .unwrap_or_else(|| NotionErrorCode::from_http_status(status));
    let message = field("message").unwrap_or_else(|| preview(&body));

    AppError::Remote {
        status,
        code,
        message,
        body,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

fn page_query(page_size: u32, start_cursor: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("page_size", page_size.to_string())];
    if let Some(cursor) = start_cursor {
        query.push(("start_cursor", cursor.to_string()));
    }
    query
}

#[async_trait::async_trait]
impl NotionTransport for NotionHttpClient {
    async fn get_page(&self, id: &NotionId) -> Result<Value, AppError> {
        self.get(&format!("pages/{}", id), &[]).await
    }

    async fn get_block_children(
        &self,
        id: &NotionId,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Value, AppError> {
        self.get(
            &format!("blocks/{}/children", id),
            &page_query(page_size, start_cursor),
        )
        .await
    }

    async fn get_database(&self, id: &NotionId) -> Result<Value, AppError> {
        self.get(&format!("databases/{}", id), &[]).await
    }

    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Value, AppError> {
        let mut body = json!({ "page_size": page_size });
        if let (Some(Value::Object(extra)), Some(target)) = (filter, body.as_object_mut()) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        self.post(&format!("databases/{}/query", id), &body).await
    }
}

// src/mcp/mod.rs
//! Model Context Protocol server: newline-delimited JSON-RPC 2.0 over a
//! byte stream, exposing the page and database services as tools.

use crate::api::{DatabaseRepository, PageRepository};
use crate::error::AppError;
use crate::formatting::{database_summary, page_summary};
use crate::service::{NotionDatabaseService, NotionPageService};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "scribeagent";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const INVALID_PARAMS: i32 = -32602;
const METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC request structure
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Reasons a tool call produced no result.
#[derive(Debug)]
enum ToolError {
    MissingArgument(&'static str),
    UnknownTool(String),
    Service(AppError),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::MissingArgument(name) => write!(f, "Missing required argument: {}", name),
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: {}", name),
            ToolError::Service(e) => write!(f, "{}", e),
        }
    }
}

impl From<AppError> for ToolError {
    fn from(err: AppError) -> Self {
        ToolError::Service(err)
    }
}

fn string_argument<'a>(arguments: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArgument(name))
}

fn pretty(value: &Value) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(|e| ToolError::Service(e.into()))
}

/// MCP server state
pub struct McpServer<R> {
    pages: NotionPageService<Arc<R>>,
    databases: NotionDatabaseService<Arc<R>>,
}

impl<R> McpServer<R>
where
    R: PageRepository + DatabaseRepository,
{
    pub fn new(repository: R) -> Self {
        let repository = Arc::new(repository);
        Self {
            pages: NotionPageService::new(Arc::clone(&repository)),
            databases: NotionDatabaseService::new(repository),
        }
    }

    /// Handles one raw input line. Returns `None` for blank lines and
    /// notifications, which get no reply.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Unparseable request: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => {
                log::warn!("Invalid request: {}", e);
                Some(JsonRpcResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {}", e),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            log::debug!("Notification '{}' received", request.method);
            return None;
        };
        log::debug!("Request '{}' (id {})", request.method, id);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, Self::initialize_result()),
            "tools/list" => JsonRpcResponse::success(id, Self::tools_list()),
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            other => {
                JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
            }
        };
        Some(response)
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn tools_list() -> Value {
        let url_property = json!({
            "type": "string",
            "description": "Notion URL or ID"
        });
        json!({
            "tools": [
                {
                    "name": "get_notion_page",
                    "description": "Fetch a Notion page's metadata and its nested block content",
                    "inputSchema": {
                        "type": "object",
                        "properties": {"url": url_property},
                        "required": ["url"]
                    }
                },
                {
                    "name": "search_notion_blocks",
                    "description": "Find blocks in a Notion page whose text contains the query (case-insensitive). Searches paragraphs, headings, list items, to-dos, toggles, quotes, callouts and code",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "url": url_property,
                            "query": {"type": "string", "description": "Text to look for"}
                        },
                        "required": ["url", "query"]
                    }
                },
                {
                    "name": "get_notion_database",
                    "description": "Fetch a Notion database's schema and every row",
                    "inputSchema": {
                        "type": "object",
                        "properties": {"url": url_property},
                        "required": ["url"]
                    }
                }
            ]
        })
    }

    async fn handle_tool_call(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params");
        };

        let tool_name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let result = match tool_name {
            "get_notion_page" => self.tool_get_page(&arguments).await,
            "search_notion_blocks" => self.tool_search_blocks(&arguments).await,
            "get_notion_database" => self.tool_get_database(&arguments).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        };

        match result {
            Ok(text) => JsonRpcResponse::success(
                id,
                json!({"content": [{"type": "text", "text": text}]}),
            ),
            Err(e) => {
                log::warn!("Tool '{}' failed: {}", tool_name, e);
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": format!("Error: {}", e)}],
                        "isError": true
                    }),
                )
            }
        }
    }

    async fn tool_get_page(&self, arguments: &Value) -> Result<String, ToolError> {
        let url = string_argument(arguments, "url")?;
        let fetched = self.pages.get_page_with_content(url).await?;
        pretty(&page_summary(&fetched.page, &fetched.content))
    }

    async fn tool_search_blocks(&self, arguments: &Value) -> Result<String, ToolError> {
        let url = string_argument(arguments, "url")?;
        let query = string_argument(arguments, "query")?;
        let matches = self.pages.search_blocks(query, url).await?;
        pretty(&json!({
            "query": query,
            "match_count": matches.len(),
            "matches": matches,
        }))
    }

    async fn tool_get_database(&self, arguments: &Value) -> Result<String, ToolError> {
        let url = string_argument(arguments, "url")?;
        let (database, rows) = self.databases.get_database_with_rows(url).await?;
        pretty(&database_summary(&database, &rows))
    }

    /// Serves requests line by line until `input` reaches end of stream.
    pub async fn serve<I, O>(&self, input: I, mut output: O) -> Result<(), AppError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut encoded = serde_json::to_string(&response)?;
            encoded.push('\n');
            output.write_all(encoded.as_bytes()).await?;
            output.flush().await?;
        }
        log::info!("Input closed, shutting down");
        Ok(())
    }
}

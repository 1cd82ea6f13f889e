// tests/common/mod.rs
//! Canned Notion responses and a recording transport for integration tests.
#![allow(dead_code)]

use parking_lot::Mutex;
use scribeagent::{AppError, NotionErrorCode, NotionId, NotionTransport};
use serde_json::{json, Value};
use std::collections::HashMap;

/// One call made against [`StubTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetPage(String),
    GetBlockChildren {
        id: String,
        cursor: Option<String>,
        page_size: u32,
    },
    GetDatabase(String),
    QueryDatabase {
        id: String,
        filter: Option<Value>,
        cursor: Option<String>,
    },
}

type CursorKey = (String, Option<String>);

/// In-memory transport. Unknown pages and databases answer 404; unknown
/// block children answer an empty list.
#[derive(Default)]
pub struct StubTransport {
    pages: HashMap<String, Value>,
    databases: HashMap<String, Value>,
    children: HashMap<CursorKey, Value>,
    queries: HashMap<CursorKey, Value>,
    failing_children: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, id: &str, page: Value) -> Self {
        self.pages.insert(id.to_string(), page);
        self
    }

    pub fn with_database(mut self, id: &str, database: Value) -> Self {
        self.databases.insert(id.to_string(), database);
        self
    }

    /// Children of `id`, as a single page of results.
    pub fn with_children(self, id: &str, blocks: Vec<Value>) -> Self {
        self.with_children_page(id, None, list(blocks, None))
    }

    /// One page of `id`'s children, answered when `cursor` is requested.
    pub fn with_children_page(mut self, id: &str, cursor: Option<&str>, body: Value) -> Self {
        self.children
            .insert((id.to_string(), cursor.map(str::to_string)), body);
        self
    }

    pub fn with_query_page(mut self, id: &str, cursor: Option<&str>, body: Value) -> Self {
        self.queries
            .insert((id.to_string(), cursor.map(str::to_string)), body);
        self
    }

    /// Fetching `id`'s children fails with a 500.
    pub fn with_failing_children(mut self, id: &str) -> Self {
        self.failing_children.push(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// IDs whose children were requested, in request order.
    pub fn children_requests(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::GetBlockChildren { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

pub fn not_found(id: &str) -> AppError {
    AppError::Remote {
        status: 404,
        code: NotionErrorCode::ObjectNotFound,
        message: format!("Could not find object with ID: {}", id),
        body: String::new(),
    }
}

#[async_trait::async_trait]
impl NotionTransport for StubTransport {
    async fn get_page(&self, id: &NotionId) -> Result<Value, AppError> {
        self.record(Call::GetPage(id.to_string()));
        self.pages
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found(id.as_str()))
    }

    async fn get_block_children(
        &self,
        id: &NotionId,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Value, AppError> {
        self.record(Call::GetBlockChildren {
            id: id.to_string(),
            cursor: start_cursor.map(str::to_string),
            page_size,
        });
        if self.failing_children.iter().any(|f| f == id.as_str()) {
            return Err(AppError::Remote {
                status: 500,
                code: NotionErrorCode::InternalError,
                message: "Unexpected error".to_string(),
                body: String::new(),
            });
        }
        let key = (id.to_string(), start_cursor.map(str::to_string));
        Ok(self
            .children
            .get(&key)
            .cloned()
            .unwrap_or_else(|| list(Vec::new(), None)))
    }

    async fn get_database(&self, id: &NotionId) -> Result<Value, AppError> {
        self.record(Call::GetDatabase(id.to_string()));
        self.databases
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found(id.as_str()))
    }

    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<Value, AppError> {
        self.record(Call::QueryDatabase {
            id: id.to_string(),
            filter: filter.cloned(),
            cursor: start_cursor.map(str::to_string),
        });
        let key = (id.to_string(), start_cursor.map(str::to_string));
        Ok(self
            .queries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| list(Vec::new(), None)))
    }
}

// --- Wire fixtures ---

pub fn segment(text: &str) -> Value {
    json!({
        "type": "text",
        "text": {"content": text, "link": null},
        "annotations": {
            "bold": false, "italic": false, "strikethrough": false,
            "underline": false, "code": false, "color": "default"
        },
        "plain_text": text,
        "href": null
    })
}

fn block(id: &str, tag: &str, has_children: bool, payload: Value) -> Value {
    let mut value = json!({
        "object": "block",
        "id": id,
        "created_time": "2024-01-15T09:00:00.000Z",
        "last_edited_time": "2024-01-16T10:30:00.000Z",
        "has_children": has_children,
        "archived": false,
        "type": tag,
    });
    value[tag] = payload;
    value
}

pub fn paragraph(id: &str, text: &str, has_children: bool) -> Value {
    block(
        id,
        "paragraph",
        has_children,
        json!({"rich_text": [segment(text)], "color": "default"}),
    )
}

/// A rich-text block such as `toggle`, `quote` or `callout`.
pub fn text_block(id: &str, tag: &str, text: &str, has_children: bool) -> Value {
    block(
        id,
        tag,
        has_children,
        json!({"rich_text": [segment(text)], "color": "default"}),
    )
}

pub fn heading(id: &str, level: u8, text: &str, has_children: bool) -> Value {
    block(
        id,
        &format!("heading_{}", level),
        has_children,
        json!({"rich_text": [segment(text)], "color": "default", "is_toggleable": has_children}),
    )
}

pub fn code(id: &str, text: &str, language: &str) -> Value {
    block(
        id,
        "code",
        false,
        json!({"rich_text": [segment(text)], "language": language, "caption": []}),
    )
}

pub fn generic(id: &str, tag: &str, has_children: bool) -> Value {
    block(id, tag, has_children, json!({}))
}

pub fn list(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "next_cursor": next_cursor,
        "has_more": next_cursor.is_some(),
        "type": "block",
        "block": {}
    })
}

pub fn page(id: &str, title: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2024-01-10T08:00:00.000Z",
        "last_edited_time": "2024-01-20T18:45:00.000Z",
        "archived": false,
        "url": format!("https://www.notion.so/{}", id),
        "parent": {"type": "workspace", "workspace": true},
        "properties": {
            "title": {"id": "title", "type": "title", "title": [segment(title)]}
        }
    })
}

pub fn database(id: &str, title: &str) -> Value {
    json!({
        "object": "database",
        "id": id,
        "created_time": "2024-01-01T00:00:00.000Z",
        "last_edited_time": "2024-01-02T00:00:00.000Z",
        "title": [segment(title)],
        "url": format!("https://www.notion.so/{}", id),
        "parent": {"type": "page_id", "page_id": "parent-page"},
        "properties": {
            "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
            "Done": {"id": "d", "name": "Done", "type": "checkbox", "checkbox": {}}
        }
    })
}

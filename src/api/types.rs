// src/api/types.rs
//! Type definitions for the Notion API module.

use crate::error::AppError;
use crate::model::common::expect_object;
use crate::model::{FromWire, NodeId};
use crate::types::NotionId;
use serde_json::Value;

/// One page of a paginated list response.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T: FromWire> PaginatedResponse<T> {
    /// Maps a `{"results": [...], "next_cursor": ..., "has_more": ...}`
    /// envelope, mapping every result with [`FromWire`].
    pub fn from_wire(value: &Value) -> Result<Self, AppError> {
        let object = expect_object(value, "List response")?;

        let results = match object.get("results").and_then(Value::as_array) {
            Some(items) => items.iter().map(T::from_wire).collect::<Result<_, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            results,
            next_cursor: object
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(str::to_string),
            has_more: object
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

/// Everything collected by following a cursor to the end.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

/// A pending child fetch in the depth-first walk of a page.
#[derive(Debug, Clone)]
pub(crate) struct FetchStep {
    /// Block (or page) whose children are fetched.
    pub block_id: NotionId,
    /// Where the fetched children attach; `None` for the top level.
    pub parent: Option<NodeId>,
    /// Depth at which `block_id`'s children are requested.
    pub depth: usize,
}

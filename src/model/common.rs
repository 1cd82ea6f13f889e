//! Shared value objects and the small readers every `from_wire` mapping uses.

use crate::error::AppError;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Borrows a wire value as a JSON object, or reports which entity could not
/// be mapped.
pub(crate) fn expect_object<'a>(
    value: &'a Value,
    entity: &str,
) -> Result<&'a Map<String, Value>, AppError> {
    value.as_object().ok_or_else(|| {
        AppError::UnsupportedShape(format!(
            "{} must be a JSON object, got {}",
            entity,
            json_kind(value)
        ))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn str_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

pub(crate) fn string_or_default(object: &Map<String, Value>, key: &str) -> String {
    str_field(object, key).unwrap_or_default().to_string()
}

pub(crate) fn bool_or_false(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn id_field(object: &Map<String, Value>) -> NotionId {
    NotionId::from_wire(str_field(object, "id").unwrap_or_default())
}

/// Parses an ISO-8601 timestamp as Notion sends it.
///
/// A trailing `Z` is rewritten to `+00:00` before RFC 3339 parsing.
/// Missing or unparseable values yield `None`.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let normalized = match raw.strip_suffix('Z') {
        Some(stem) => format!("{}+00:00", stem),
        None => raw.to_string(),
    };
    match DateTime::parse_from_rfc3339(&normalized) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            log::debug!("Ignoring unparseable timestamp '{}': {}", raw, e);
            None
        }
    }
}

pub(crate) fn timestamp_field(object: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(str_field(object, key))
}

/// What kind of object a parent reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentType {
    PageId,
    DatabaseId,
    Workspace,
    BlockId,
}

impl ParentType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "page_id" => Some(Self::PageId),
            "database_id" => Some(Self::DatabaseId),
            "workspace" => Some(Self::Workspace),
            "block_id" => Some(Self::BlockId),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageId => "page_id",
            Self::DatabaseId => "database_id",
            Self::Workspace => "workspace",
            Self::BlockId => "block_id",
        }
    }
}

/// Parent reference of a page, database or block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub parent_type: ParentType,
    /// Absent only for workspace parents.
    pub id: Option<NotionId>,
}

impl Parent {
    pub fn workspace() -> Self {
        Self {
            parent_type: ParentType::Workspace,
            id: None,
        }
    }

    /// Maps a wire parent object. Unknown or missing parent types fall back
    /// to a workspace parent.
    pub fn from_wire(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::workspace();
        };
        let Some(parent_type) = str_field(object, "type").and_then(ParentType::from_tag) else {
            log::debug!("Parent without a recognised type, treating as workspace");
            return Self::workspace();
        };
        let id = match parent_type {
            ParentType::Workspace => None,
            other => str_field(object, other.as_str()).map(NotionId::from_wire),
        };
        Self { parent_type, id }
    }
}

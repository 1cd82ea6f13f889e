mod block;
pub mod blocks;
pub mod common;
mod property_value;
pub mod rich_text;
mod tree;

pub use block::{Block, BlockContent, BlockType};
pub use blocks::{CodeBlock, TextBlock, TextKind};
pub use common::{parse_timestamp, Parent, ParentType};
pub use property_value::{PropertyType, PropertyTypeValue, PropertyValue};
pub use rich_text::{concat_plain_text, RichTextContent};
pub use tree::{BlockNode, BlockTree, BlockTreeBuilder, DepthFirst, NodeId};

use crate::error::AppError;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use common::{bool_or_false, expect_object, id_field, string_or_default, timestamp_field};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kinds of object the Notion API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Page,
    Database,
    Block,
    User,
    RichText,
    PropertyItem,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Page => "page",
            ObjectType::Database => "database",
            ObjectType::Block => "block",
            ObjectType::User => "user",
            ObjectType::RichText => "rich_text",
            ObjectType::PropertyItem => "property_item",
        }
    }
}

/// Anything fetched from Notion that carries an identity.
pub trait NotionObject {
    fn id(&self) -> &NotionId;
    fn object_type(&self) -> ObjectType;
}

/// Mapping from a raw API payload into a domain value.
///
/// Implementations default every missing field. The only failure is a
/// payload that is not a JSON object.
pub trait FromWire: Sized {
    fn from_wire(value: &Value) -> Result<Self, AppError>;
}

/// A Notion page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NotionId,
    pub parent: Parent,
    pub properties: IndexMap<String, PropertyValue>,
    pub url: String,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub archived: bool,
}

impl Page {
    /// Plain text of the first title property, or `""` when there is none.
    pub fn get_title(&self) -> String {
        self.properties
            .values()
            .find(|property| property.is_title())
            .map(PropertyValue::get_plain_text)
            .unwrap_or_default()
    }
}

impl FromWire for Page {
    fn from_wire(value: &Value) -> Result<Self, AppError> {
        let object = expect_object(value, "Page")?;

        let mut properties = IndexMap::new();
        if let Some(wire_properties) = object.get("properties").and_then(Value::as_object) {
            for (name, wire) in wire_properties {
                match PropertyValue::from_wire(wire) {
                    Ok(property) => {
                        properties.insert(name.clone(), property);
                    }
                    Err(e) => log::debug!("Skipping property '{}': {}", name, e),
                }
            }
        }

        Ok(Self {
            id: id_field(object),
            parent: object
                .get("parent")
                .map(Parent::from_wire)
                .unwrap_or_else(Parent::workspace),
            properties,
            url: string_or_default(object, "url"),
            created_time: timestamp_field(object, "created_time"),
            last_edited_time: timestamp_field(object, "last_edited_time"),
            archived: bool_or_false(object, "archived"),
        })
    }
}

impl NotionObject for Page {
    fn id(&self) -> &NotionId {
        &self.id
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Page
    }
}

/// A Notion database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: NotionId,
    pub parent: Parent,
    pub title: Vec<RichTextContent>,
    /// Property schema exactly as the API returned it.
    pub properties: IndexMap<String, Value>,
    pub url: String,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub archived: bool,
}

impl Database {
    pub fn get_title(&self) -> String {
        concat_plain_text(&self.title)
    }
}

impl FromWire for Database {
    fn from_wire(value: &Value) -> Result<Self, AppError> {
        let object = expect_object(value, "Database")?;

        let properties = object
            .get("properties")
            .and_then(Value::as_object)
            .map(|schema| {
                schema
                    .iter()
                    .map(|(name, definition)| (name.clone(), definition.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: id_field(object),
            parent: object
                .get("parent")
                .map(Parent::from_wire)
                .unwrap_or_else(Parent::workspace),
            title: RichTextContent::list_field(object, "title"),
            properties,
            url: string_or_default(object, "url"),
            created_time: timestamp_field(object, "created_time"),
            last_edited_time: timestamp_field(object, "last_edited_time"),
            archived: bool_or_false(object, "archived"),
        })
    }
}

impl NotionObject for Database {
    fn id(&self) -> &NotionId {
        &self.id
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn wire_page() -> Value {
        json!({
            "object": "page",
            "id": "page-123",
            "created_time": "2024-03-01T10:00:00.000Z",
            "last_edited_time": "2024-03-02T11:30:00.000Z",
            "archived": false,
            "url": "https://www.notion.so/Test-Page-page123",
            "parent": {"type": "workspace", "workspace": true},
            "properties": {
                "Status": {"id": "s", "type": "status", "status": {"name": "Done"}},
                "Name": {
                    "id": "title",
                    "type": "title",
                    "title": [{"type": "text", "text": {"content": "Test Page"}, "plain_text": "Test Page"}]
                },
                "Done": {"id": "d", "type": "checkbox", "checkbox": false}
            }
        })
    }

    #[test]
    fn maps_page_and_finds_title() {
        let page = Page::from_wire(&wire_page()).unwrap();

        assert_eq!(page.id.as_str(), "page-123");
        assert_eq!(page.object_type(), ObjectType::Page);
        assert_eq!(page.get_title(), "Test Page");
        assert_eq!(page.parent, Parent::workspace());
        let names: Vec<&str> = page.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Status", "Name", "Done"]);
        assert_eq!(page.properties["Done"].get_plain_text(), "false");
        assert!(page.created_time.unwrap() < page.last_edited_time.unwrap());
    }

    #[test]
    fn page_without_title_property_has_empty_title() {
        let page = Page::from_wire(&json!({"id": "p", "properties": {}})).unwrap();
        assert_eq!(page.get_title(), "");
        assert_eq!(page.url, "");
        assert_eq!(page.created_time, None);
    }

    #[test]
    fn page_mapping_is_idempotent() {
        let wire = wire_page();
        assert_eq!(Page::from_wire(&wire).unwrap(), Page::from_wire(&wire).unwrap());
    }

    #[test]
    fn maps_database_title_and_schema() {
        let database = Database::from_wire(&json!({
            "object": "database",
            "id": "db-1",
            "title": [
                {"type": "text", "text": {"content": "Reading "}, "plain_text": "Reading "},
                {"type": "text", "text": {"content": "List"}, "plain_text": "List"}
            ],
            "parent": {"type": "page_id", "page_id": "page-123"},
            "properties": {"Name": {"id": "title", "type": "title", "title": {}}}
        }))
        .unwrap();

        assert_eq!(database.get_title(), "Reading List");
        assert_eq!(database.object_type(), ObjectType::Database);
        assert_eq!(database.parent.parent_type, ParentType::PageId);
        assert_eq!(database.properties["Name"]["type"], json!("title"));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        assert!(matches!(
            Page::from_wire(&json!(["not", "a", "page"])),
            Err(AppError::UnsupportedShape(_))
        ));
        assert!(matches!(
            Database::from_wire(&Value::Null),
            Err(AppError::UnsupportedShape(_))
        ));
    }
}

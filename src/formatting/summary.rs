// src/formatting/summary.rs
//! JSON summaries of pages and databases, as returned by the MCP tools.

use super::block_renderer::tree_as_dicts;
use crate::model::{BlockTree, Database, Page};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

fn timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |t| json!(t.to_rfc3339()))
}

/// `{id, title, url, created_time, last_edited_time, content}` where
/// `content` holds one dictionary per top-level block.
pub fn page_summary(page: &Page, content: &BlockTree) -> Value {
    let mut summary = json!({
        "id": page.id.as_str(),
        "title": page.get_title(),
        "url": page.url,
        "created_time": timestamp(page.created_time),
        "last_edited_time": timestamp(page.last_edited_time),
        "content": tree_as_dicts(content),
    });
    if !content.truncated().is_empty() {
        let truncated: Vec<&str> = content.truncated().iter().map(|id| id.as_str()).collect();
        summary["truncated_blocks"] = json!(truncated);
    }
    summary
}

/// Property values of one row, keyed by property name, as display text.
pub fn row_summary(row: &Page) -> Value {
    let properties: Map<String, Value> = row
        .properties
        .iter()
        .map(|(name, value)| (name.clone(), json!(value.get_plain_text())))
        .collect();

    json!({
        "id": row.id.as_str(),
        "title": row.get_title(),
        "url": row.url,
        "properties": properties,
    })
}

/// `{id, title, url, properties, rows}`; `properties` lists the schema's
/// property names in server order.
pub fn database_summary(database: &Database, rows: &[Page]) -> Value {
    let property_names: Vec<&str> = database.properties.keys().map(String::as_str).collect();
    json!({
        "id": database.id.as_str(),
        "title": database.get_title(),
        "url": database.url,
        "created_time": timestamp(database.created_time),
        "last_edited_time": timestamp(database.last_edited_time),
        "properties": property_names,
        "rows": rows.iter().map(row_summary).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FromWire;
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        Page::from_wire(&json!({
            "id": "row-1",
            "url": "https://www.notion.so/row1",
            "created_time": "2024-05-01T08:00:00.000Z",
            "properties": {
                "Name": {"id": "title", "type": "title", "title": [{"plain_text": "First row"}]},
                "Done": {"id": "d", "type": "checkbox", "checkbox": true},
                "Tags": {"id": "t", "type": "multi_select", "multi_select": []}
            }
        }))
        .unwrap()
    }

    #[test]
    fn page_summary_carries_metadata_and_content() {
        let summary = page_summary(&page(), &BlockTree::empty());
        assert_eq!(summary["title"], json!("First row"));
        assert_eq!(summary["created_time"], json!("2024-05-01T08:00:00+00:00"));
        assert_eq!(summary["last_edited_time"], Value::Null);
        assert_eq!(summary["content"], json!([]));
        assert!(summary.get("truncated_blocks").is_none());
    }

    #[test]
    fn database_summary_lists_rows_with_plain_values() {
        let database = Database::from_wire(&json!({
            "id": "db",
            "title": [{"plain_text": "Tasks"}],
            "properties": {"Name": {"type": "title"}, "Done": {"type": "checkbox"}}
        }))
        .unwrap();

        let summary = database_summary(&database, &[page()]);
        assert_eq!(summary["title"], json!("Tasks"));
        assert_eq!(summary["properties"], json!(["Name", "Done"]));
        assert_eq!(
            summary["rows"][0]["properties"],
            json!({
                "Name": "First row",
                "Done": "true",
                "Tags": "<Unsupported property type: multi_select>"
            })
        );
    }
}

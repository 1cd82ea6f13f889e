use super::common::str_field;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One run of Notion rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextContent {
    pub content: String,
    pub plain_text: String,
    pub annotations: Option<Map<String, Value>>,
    pub href: Option<String>,
}

impl RichTextContent {
    /// Maps one wire segment.
    ///
    /// Text segments take `content` from `text.content`; mention and
    /// equation segments have no such field and use their plain text.
    /// Returns `None` for values that are not objects.
    pub fn from_wire(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let text_content = object
            .get("text")
            .and_then(Value::as_object)
            .and_then(|text| str_field(text, "content"));

        let plain_text = match str_field(object, "plain_text") {
            Some(plain) => plain.to_string(),
            None => text_content.unwrap_or_default().to_string(),
        };
        let content = text_content
            .map(str::to_string)
            .unwrap_or_else(|| plain_text.clone());

        Some(Self {
            content,
            plain_text,
            annotations: object.get("annotations").and_then(Value::as_object).cloned(),
            href: str_field(object, "href").map(str::to_string),
        })
    }

    /// Maps a wire array of segments, skipping anything that is not an object.
    pub fn list_from_wire(value: Option<&Value>) -> Vec<Self> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Self::from_wire).collect())
            .unwrap_or_default()
    }

    /// Maps `object[key]` as a rich text array.
    pub(crate) fn list_field(object: &Map<String, Value>, key: &str) -> Vec<Self> {
        Self::list_from_wire(object.get(key))
    }

    /// Builds a plain, unannotated text run.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            content: text.clone(),
            plain_text: text,
            annotations: None,
            href: None,
        }
    }
}

/// Concatenates the plain text of every segment, in order.
pub fn concat_plain_text(segments: &[RichTextContent]) -> String {
    segments.iter().map(|s| s.plain_text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_text_segment_with_annotations() {
        let wire = json!([{
            "type": "text",
            "text": {"content": "Hello world", "link": null},
            "annotations": {
                "bold": false, "italic": true, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": "Hello world",
            "href": null
        }]);

        let segments = RichTextContent::list_from_wire(Some(&wire));
        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert_eq!(segment.content, "Hello world");
        assert_eq!(segment.plain_text, "Hello world");
        assert_eq!(
            segment.annotations.as_ref().unwrap()["italic"],
            Value::Bool(true)
        );
        assert_eq!(segment.href, None);
    }

    #[test]
    fn plain_text_defaults_to_content() {
        let segment =
            RichTextContent::from_wire(&json!({"type": "text", "text": {"content": "Test"}}))
                .unwrap();
        assert_eq!(segment.plain_text, "Test");
    }

    #[test]
    fn mentions_keep_their_plain_text() {
        let segment = RichTextContent::from_wire(&json!({
            "type": "mention",
            "mention": {"type": "date", "date": {"start": "2024-01-01"}},
            "plain_text": "January 1, 2024",
            "href": "https://www.notion.so/x"
        }))
        .unwrap();
        assert_eq!(segment.content, "January 1, 2024");
        assert_eq!(segment.href.as_deref(), Some("https://www.notion.so/x"));
    }

    #[test]
    fn concatenates_in_order() {
        let segments = vec![RichTextContent::plain("First "), RichTextContent::plain("second")];
        assert_eq!(concat_plain_text(&segments), "First second");
    }
}

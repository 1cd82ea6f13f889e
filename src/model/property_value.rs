use super::common::{expect_object, str_field};
use super::rich_text::{concat_plain_text, RichTextContent};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property types a Notion page can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Date,
    People,
    Files,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    Relation,
    Rollup,
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
    Status,
}

impl PropertyType {
    /// Parses a wire type tag. Tags outside the enumeration give `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let parsed = match tag {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "number" => Self::Number,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            "date" => Self::Date,
            "people" => Self::People,
            "files" => Self::Files,
            "checkbox" => Self::Checkbox,
            "url" => Self::Url,
            "email" => Self::Email,
            "phone_number" => Self::PhoneNumber,
            "formula" => Self::Formula,
            "relation" => Self::Relation,
            "rollup" => Self::Rollup,
            "created_time" => Self::CreatedTime,
            "created_by" => Self::CreatedBy,
            "last_edited_time" => Self::LastEditedTime,
            "last_edited_by" => Self::LastEditedBy,
            "status" => Self::Status,
            _ => return None,
        };
        Some(parsed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
            Self::People => "people",
            Self::Files => "files",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Formula => "formula",
            Self::Relation => "relation",
            Self::Rollup => "rollup",
            Self::CreatedTime => "created_time",
            Self::CreatedBy => "created_by",
            Self::LastEditedTime => "last_edited_time",
            Self::LastEditedBy => "last_edited_by",
            Self::Status => "status",
        }
    }
}

/// Property value: wraps a typed value with its property ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub id: String,
    pub value: PropertyTypeValue,
}

/// The typed payload of a property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyTypeValue {
    Title { title: Vec<RichTextContent> },
    RichText { rich_text: Vec<RichTextContent> },
    Checkbox { checkbox: bool },
    /// Any other tag, known to [`PropertyType`] or not. The raw wire value
    /// is kept untouched.
    Generic { tag: String, data: Value },
}

impl PropertyValue {
    /// Maps a wire property value, dispatching on its `type` tag.
    ///
    /// `title`, `rich_text` and `checkbox` get typed variants; every other
    /// tag, including ones this crate has never heard of, becomes
    /// [`PropertyTypeValue::Generic`].
    pub fn from_wire(value: &Value) -> Result<Self, AppError> {
        let object = expect_object(value, "Property value")?;
        let id = str_field(object, "id").unwrap_or_default().to_string();
        let tag = str_field(object, "type").unwrap_or_default();

        let typed = match tag {
            "title" => PropertyTypeValue::Title {
                title: RichTextContent::list_field(object, "title"),
            },
            "rich_text" => PropertyTypeValue::RichText {
                rich_text: RichTextContent::list_field(object, "rich_text"),
            },
            "checkbox" => PropertyTypeValue::Checkbox {
                checkbox: object
                    .get("checkbox")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            other => {
                log::debug!("Keeping property '{}' of type '{}' as raw JSON", id, other);
                PropertyTypeValue::Generic {
                    tag: other.to_string(),
                    data: value.clone(),
                }
            }
        };

        Ok(Self { id, value: typed })
    }

    /// The wire type tag of this value.
    pub fn type_tag(&self) -> &str {
        match &self.value {
            PropertyTypeValue::Title { .. } => "title",
            PropertyTypeValue::RichText { .. } => "rich_text",
            PropertyTypeValue::Checkbox { .. } => "checkbox",
            PropertyTypeValue::Generic { tag, .. } => tag,
        }
    }

    /// The enumerated type, or `None` for tags outside the enumeration.
    pub fn property_type(&self) -> Option<PropertyType> {
        PropertyType::from_tag(self.type_tag())
    }

    /// Display text for the value.
    pub fn get_plain_text(&self) -> String {
        match &self.value {
            PropertyTypeValue::Title { title } => concat_plain_text(title),
            PropertyTypeValue::RichText { rich_text } => concat_plain_text(rich_text),
            PropertyTypeValue::Checkbox { checkbox } => checkbox.to_string(),
            PropertyTypeValue::Generic { tag, .. } => {
                format!("<Unsupported property type: {}>", tag)
            }
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self.value, PropertyTypeValue::Title { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_title_property() {
        let value = PropertyValue::from_wire(&json!({
            "id": "test_id",
            "type": "title",
            "title": [{"type": "text", "text": {"content": "Test Title"}, "plain_text": "Test Title"}]
        }))
        .unwrap();

        assert!(value.is_title());
        assert_eq!(value.id, "test_id");
        assert_eq!(value.property_type(), Some(PropertyType::Title));
        assert_eq!(value.get_plain_text(), "Test Title");
    }

    #[test]
    fn maps_rich_text_property() {
        let value = PropertyValue::from_wire(&json!({
            "id": "test_id",
            "type": "rich_text",
            "rich_text": [{"type": "text", "text": {"content": "Test Text"}, "plain_text": "Test Text"}]
        }))
        .unwrap();

        assert_eq!(value.property_type(), Some(PropertyType::RichText));
        assert_eq!(value.get_plain_text(), "Test Text");
    }

    #[test]
    fn maps_checkbox_property() {
        let value =
            PropertyValue::from_wire(&json!({"id": "done", "type": "checkbox", "checkbox": true}))
                .unwrap();
        assert_eq!(
            value.value,
            PropertyTypeValue::Checkbox { checkbox: true }
        );
        assert_eq!(value.get_plain_text(), "true");
    }

    #[test]
    fn tags_outside_the_enumeration_stay_generic() {
        let wire = json!({
            "id": "test_id",
            "type": "unique_id",
            "unique_id": {"prefix": "WOR", "number": 128}
        });
        let value = PropertyValue::from_wire(&wire).unwrap();

        assert_eq!(value.property_type(), None);
        assert_eq!(value.type_tag(), "unique_id");
        assert!(value.get_plain_text().contains("unique_id"));
        match value.value {
            PropertyTypeValue::Generic { data, .. } => assert_eq!(data, wire),
            other => panic!("expected generic value, got {other:?}"),
        }
    }

    #[test]
    fn enumerated_but_unmodelled_tags_stay_generic() {
        let value = PropertyValue::from_wire(&json!({
            "id": "test_id",
            "type": "multi_select",
            "multi_select": [{"id": "123", "name": "Option 1", "color": "blue"}]
        }))
        .unwrap();
        assert_eq!(value.property_type(), Some(PropertyType::MultiSelect));
        assert!(value.get_plain_text().contains("multi_select"));

        let url = PropertyValue::from_wire(&json!({"id": "u", "type": "url", "url": "https://example.com"}))
            .unwrap();
        assert_eq!(url.get_plain_text(), "<Unsupported property type: url>");
        assert!(!url.is_title());
    }
}

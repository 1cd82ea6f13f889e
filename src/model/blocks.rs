use super::common::{bool_or_false, str_field};
use super::rich_text::{concat_plain_text, RichTextContent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_COLOR: &str = "default";

/// Which text-bearing block a [`TextBlock`] is, with the fields only that
/// kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    Paragraph,
    Heading { level: u8, is_toggleable: bool },
    BulletedListItem,
    NumberedListItem,
    ToDo { checked: bool },
    Toggle,
    Quote,
    Callout,
}

/// Text content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub rich_text: Vec<RichTextContent>,
    pub color: String,
    pub kind: TextKind,
}

impl TextBlock {
    /// Maps the type-specific payload (`block[tag]`) of a text block.
    pub(crate) fn from_payload(payload: Option<&Map<String, Value>>, kind: TextKind) -> Self {
        let Some(payload) = payload else {
            return Self {
                rich_text: Vec::new(),
                color: DEFAULT_COLOR.to_string(),
                kind,
            };
        };

        let kind = match kind {
            TextKind::Heading { level, .. } => TextKind::Heading {
                level,
                is_toggleable: bool_or_false(payload, "is_toggleable"),
            },
            TextKind::ToDo { .. } => TextKind::ToDo {
                checked: bool_or_false(payload, "checked"),
            },
            other => other,
        };

        Self {
            rich_text: RichTextContent::list_field(payload, "rich_text"),
            color: str_field(payload, "color")
                .unwrap_or(DEFAULT_COLOR)
                .to_string(),
            kind,
        }
    }

    pub fn plain_text(&self) -> String {
        concat_plain_text(&self.rich_text)
    }
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub rich_text: Vec<RichTextContent>,
    pub language: String,
    pub caption: Vec<RichTextContent>,
}

impl CodeBlock {
    pub(crate) fn from_payload(payload: Option<&Map<String, Value>>) -> Self {
        match payload {
            Some(payload) => Self {
                rich_text: RichTextContent::list_field(payload, "rich_text"),
                language: str_field(payload, "language")
                    .unwrap_or("plain text")
                    .to_string(),
                caption: RichTextContent::list_field(payload, "caption"),
            },
            None => Self {
                rich_text: Vec::new(),
                language: "plain text".to_string(),
                caption: Vec::new(),
            },
        }
    }

    pub fn plain_text(&self) -> String {
        concat_plain_text(&self.rich_text)
    }

    pub fn caption_text(&self) -> String {
        concat_plain_text(&self.caption)
    }
}

use super::blocks::{CodeBlock, TextBlock, TextKind};
use super::common::{bool_or_false, expect_object, id_field, str_field, timestamp_field};
use super::{FromWire, NotionObject, ObjectType};
use crate::error::AppError;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Block type tags known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    ChildPage,
    ChildDatabase,
    Callout,
    Quote,
    Code,
    Image,
    Video,
    File,
    Divider,
    Table,
    TableRow,
    SyncedBlock,
    Template,
    LinkToPage,
    LinkPreview,
    Bookmark,
    Embed,
    Equation,
    /// Any tag outside the list above.
    Unsupported,
}

impl BlockType {
    /// Parses a wire tag. Unknown tags map to [`BlockType::Unsupported`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "toggle" => Self::Toggle,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            "callout" => Self::Callout,
            "quote" => Self::Quote,
            "code" => Self::Code,
            "image" => Self::Image,
            "video" => Self::Video,
            "file" => Self::File,
            "divider" => Self::Divider,
            "table" => Self::Table,
            "table_row" => Self::TableRow,
            "synced_block" => Self::SyncedBlock,
            "template" => Self::Template,
            "link_to_page" => Self::LinkToPage,
            "link_preview" => Self::LinkPreview,
            "bookmark" => Self::Bookmark,
            "embed" => Self::Embed,
            "equation" => Self::Equation,
            _ => Self::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::Callout => "callout",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Divider => "divider",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::SyncedBlock => "synced_block",
            Self::Template => "template",
            Self::LinkToPage => "link_to_page",
            Self::LinkPreview => "link_preview",
            Self::Bookmark => "bookmark",
            Self::Embed => "embed",
            Self::Equation => "equation",
            Self::Unsupported => "unsupported",
        }
    }

    /// The [`TextKind`] for tags that carry a text payload.
    fn text_kind(&self) -> Option<TextKind> {
        let kind = match self {
            Self::Paragraph => TextKind::Paragraph,
            Self::Heading1 => heading(1),
            Self::Heading2 => heading(2),
            Self::Heading3 => heading(3),
            Self::BulletedListItem => TextKind::BulletedListItem,
            Self::NumberedListItem => TextKind::NumberedListItem,
            Self::ToDo => TextKind::ToDo { checked: false },
            Self::Toggle => TextKind::Toggle,
            Self::Quote => TextKind::Quote,
            Self::Callout => TextKind::Callout,
            _ => return None,
        };
        Some(kind)
    }
}

fn heading(level: u8) -> TextKind {
    TextKind::Heading {
        level,
        is_toggleable: false,
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific content of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockContent {
    Text(TextBlock),
    Code(CodeBlock),
    /// Recognised tags without a dedicated mapping, and unknown tags.
    Generic,
}

/// A single content unit of a page.
///
/// Children live in the owning [`BlockTree`](super::BlockTree), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: NotionId,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    pub has_children: bool,
    pub archived: bool,
    pub block_type: BlockType,
    pub content: BlockContent,
}

impl Block {
    /// Concatenated plain text of text and code blocks, `None` for the rest.
    pub fn plain_text(&self) -> Option<String> {
        match &self.content {
            BlockContent::Text(text) => Some(text.plain_text()),
            BlockContent::Code(code) => Some(code.plain_text()),
            BlockContent::Generic => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match &self.content {
            BlockContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodeBlock> {
        match &self.content {
            BlockContent::Code(code) => Some(code),
            _ => None,
        }
    }
}

impl FromWire for Block {
    /// Dispatches on the `type` tag. Unknown tags never fail; they produce
    /// an `Unsupported` block with generic content.
    fn from_wire(value: &Value) -> Result<Self, AppError> {
        let object = expect_object(value, "Block")?;
        let tag = str_field(object, "type").unwrap_or_default();
        let block_type = BlockType::from_tag(tag);
        let payload = object.get(tag).and_then(Value::as_object);

        let content = if let Some(kind) = block_type.text_kind() {
            BlockContent::Text(TextBlock::from_payload(payload, kind))
        } else if block_type == BlockType::Code {
            BlockContent::Code(CodeBlock::from_payload(payload))
        } else {
            if block_type == BlockType::Unsupported {
                log::debug!("Unrecognised block type '{}', keeping it as unsupported", tag);
            }
            BlockContent::Generic
        };

        Ok(Self {
            id: id_field(object),
            created_time: timestamp_field(object, "created_time"),
            last_edited_time: timestamp_field(object, "last_edited_time"),
            has_children: bool_or_false(object, "has_children"),
            archived: bool_or_false(object, "archived"),
            block_type,
            content,
        })
    }
}

impl NotionObject for Block {
    fn id(&self) -> &NotionId {
        &self.id
    }

    fn object_type(&self) -> ObjectType {
        ObjectType::Block
    }
}

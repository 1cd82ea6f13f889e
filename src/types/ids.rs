use super::ValidationError;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Hosts accepted as Notion page URLs.
const NOTION_HOSTS: &[&str] = &["notion.so", "www.notion.so"];

const NOT_A_NOTION_URL: &str = "Not a valid Notion URL";
const NO_ID_IN_URL: &str = "Could not extract ID from URL";

/// A Notion resource ID, kept exactly as the caller or the API supplied it.
///
/// Notion accepts dashed and undashed IDs interchangeably, so no
/// normalisation happens here; the only requirement is that the ID is not
/// blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Creates an ID from a literal string.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidId("ID cannot be empty".to_string()));
        }
        Ok(NotionId(trimmed.to_string()))
    }

    /// Wraps an ID taken from a wire payload. Blank IDs are kept as-is;
    /// the wire mapping never rejects a payload for a missing ID.
    pub(crate) fn from_wire(id: &str) -> Self {
        NotionId(id.to_string())
    }

    /// Returns the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::new(s).map_err(serde::de::Error::custom)
    }
}

/// Extracts a resource ID from a Notion URL.
///
/// The authority must be exactly `notion.so` or `www.notion.so`, as
/// written: no port, no userinfo, no change of case. The path is
/// stripped of surrounding slashes and split on `-`; the last segment wins,
/// with any `?query` suffix removed. A path without hyphens is returned
/// whole.
pub fn extract_id(url: &str) -> Result<NotionId, AppError> {
    let parsed = Url::parse(url.trim()).map_err(|_| AppError::invalid_url(url, NOT_A_NOTION_URL))?;

    let authority = raw_authority(url.trim()).unwrap_or_default();
    if !NOTION_HOSTS.contains(&authority) {
        return Err(AppError::invalid_url(url, NOT_A_NOTION_URL));
    }

    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        return Err(AppError::invalid_url(url, NO_ID_IN_URL));
    }

    let last_segment = path.rsplit('-').next().unwrap_or(path);
    let id = last_segment.split('?').next().unwrap_or(last_segment);

    NotionId::new(id).map_err(|_| AppError::invalid_url(url, NO_ID_IN_URL))
}

/// The authority exactly as written in `url`, between `://` and the first
/// `/`, `?` or `#`, before any case folding or port splitting.
fn raw_authority(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Whether an input string should go through [`extract_id`] rather than be
/// used as a literal ID. A plain substring check for `notion.so`.
pub fn looks_like_notion_url(input: &str) -> bool {
    input.contains("notion.so")
}

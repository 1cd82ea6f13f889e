// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use std::fmt;

/// API key for Notion API authentication
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation.
    ///
    /// Keys end up in an HTTP header, so blank keys and keys with
    /// whitespace or control characters are rejected up front.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.trim().is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot contain whitespace or control characters".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// How many levels of nested child blocks to fetch below a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxDepth(usize);

impl MaxDepth {
    pub fn new(depth: usize) -> Result<Self, ValidationError> {
        if depth > NOTION_MAX_FETCH_DEPTH {
            return Err(ValidationError::OutOfBounds {
                value: depth,
                min: 0,
                max: NOTION_MAX_FETCH_DEPTH,
            });
        }
        Ok(Self(depth))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxDepth {
    fn default() -> Self {
        Self(crate::constants::DEFAULT_MAX_DEPTH)
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

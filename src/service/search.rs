//! Case-insensitive substring search over a fetched block tree.

use crate::error::AppError;
use crate::model::{BlockContent, BlockNode, BlockTree, BlockType};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// A block whose plain text contains the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockMatch {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Full plain text of the matching block.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Matches found below this block.
    pub children: Vec<BlockMatch>,
}

/// Matches a literal query against block text, ignoring case.
#[derive(Debug, Clone)]
pub struct BlockMatcher {
    pattern: Regex,
}

impl BlockMatcher {
    /// `None` for an empty query, which matches nothing.
    pub fn new(query: &str) -> Result<Option<Self>, AppError> {
        if query.is_empty() {
            return Ok(None);
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::InvalidQuery(e.to_string()))?;
        Ok(Some(Self { pattern }))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Matches in pre-order. A matching text or code block is reported with
    /// its subtree's matches nested under it; a non-matching block passes
    /// its subtree's matches up in its own place.
    pub fn search(&self, tree: &BlockTree) -> Vec<BlockMatch> {
        tree.roots().flat_map(|node| self.collect(node)).collect()
    }

    fn collect(&self, node: BlockNode<'_>) -> Vec<BlockMatch> {
        let nested: Vec<BlockMatch> = node.children().flat_map(|child| self.collect(child)).collect();

        let block = node.block();
        let (content, language) = match &block.content {
            BlockContent::Text(text) => (text.plain_text(), None),
            BlockContent::Code(code) => (code.plain_text(), Some(code.language.clone())),
            BlockContent::Generic => return nested,
        };

        if !self.is_match(&content) {
            return nested;
        }

        vec![BlockMatch {
            block_type: block.block_type,
            content,
            language,
            children: nested,
        }]
    }
}

// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Value of the `Notion-Version` header sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Default number of nested block levels fetched below a page.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Upper bound accepted for a configured fetch depth.
pub const NOTION_MAX_FETCH_DEPTH: usize = 50;

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Number of spaces per depth level in the text rendering of a block tree.
pub const INDENT_SPACES: usize = 4;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;

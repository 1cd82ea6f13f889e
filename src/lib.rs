// src/lib.rs
//! scribeagent library: retrieves Notion pages as typed block trees.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ServiceConfig`
//! - **Domain model**: `Page`, `Database`, `Block`, `BlockTree`, etc.
//! - **Domain types**: `NotionId`, `ApiKey`, `MaxDepth`
//! - **API**: `NotionTransport`, `NotionHttpClient`, `NotionApiRepository`
//! - **Services**: `NotionPageService`, `NotionDatabaseService`
//! - **Formatting**: `format_as_dict`, `format_as_text`, `page_summary`
//! - **MCP**: `McpServer`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod mcp;
pub mod model;
pub mod service;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, OutputFormat, ServiceConfig};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockContent, BlockNode, BlockTree, BlockTreeBuilder, BlockType, CodeBlock, Database,
    FromWire, NodeId, NotionObject, ObjectType, Page, Parent, ParentType, PropertyType,
    PropertyTypeValue, PropertyValue, RichTextContent, TextBlock, TextKind,
};

// --- Domain Types ---
pub use crate::types::{extract_id, ApiKey, MaxDepth, NotionId};

// --- API ---
pub use crate::api::{
    DatabaseRepository, NotionApiRepository, NotionHttpClient, NotionTransport, PageRepository,
};

// --- Services ---
pub use crate::service::{
    resolve_id, BlockMatch, NotionDatabaseService, NotionPageService, PageWithContent,
};

// --- Formatting ---
pub use crate::formatting::{format_as_dict, format_as_text, page_summary};

// --- MCP ---
pub use crate::mcp::McpServer;

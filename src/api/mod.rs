// src/api/mod.rs
//! Notion API interaction: the transport, and the repositories built on it.
//!
//! Three layers with clear seams:
//! - [`NotionTransport`] performs one HTTP call and returns raw JSON.
//! - [`fetch_all_pages`] follows cursors for any list endpoint.
//! - [`NotionApiRepository`] maps JSON into the domain model and walks the
//!   block hierarchy under a depth bound.

pub mod client;
mod pagination;
mod repository;
mod types;

use crate::error::AppError;
use crate::model::{BlockTree, Database, Page};
use crate::types::NotionId;
use serde_json::Value;

pub use client::NotionHttpClient;
pub use pagination::fetch_all_pages;
pub use repository::NotionApiRepository;
pub use types::{PaginatedResponse, PaginationResult};

/// One request per call against the Notion REST API.
///
/// Implementations return the parsed response body untouched; non-2xx
/// answers become [`AppError::Remote`].
#[async_trait::async_trait]
pub trait NotionTransport: Send + Sync {
    /// `GET /pages/{id}`
    async fn get_page(&self, id: &NotionId) -> Result<Value, AppError>;

    /// `GET /blocks/{id}/children?page_size=..&start_cursor=..`
    async fn get_block_children(
        &self,
        id: &NotionId,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Value, AppError>;

    /// `GET /databases/{id}`
    async fn get_database(&self, id: &NotionId) -> Result<Value, AppError>;

    /// `POST /databases/{id}/query`. The keys of `filter` (for example
    /// `filter` or `sorts`) are merged into the request body.
    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<Value, AppError>;
}

/// The ability to retrieve pages and their block trees.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait PageRepository: Send + Sync {
    async fn get_page(&self, id: &NotionId) -> Result<Page, AppError>;

    /// Block tree below `id`, fetched starting at `current_depth`.
    async fn get_page_content(
        &self,
        id: &NotionId,
        current_depth: usize,
    ) -> Result<BlockTree, AppError>;
}

/// The ability to retrieve databases and their rows.
#[async_trait::async_trait]
pub trait DatabaseRepository: Send + Sync {
    async fn get_database(&self, id: &NotionId) -> Result<Database, AppError>;

    /// Every row of the database, in the order the API returned them.
    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
    ) -> Result<Vec<Page>, AppError>;
}

#[async_trait::async_trait]
impl<R: PageRepository + ?Sized> PageRepository for std::sync::Arc<R> {
    async fn get_page(&self, id: &NotionId) -> Result<Page, AppError> {
        (**self).get_page(id).await
    }

    async fn get_page_content(
        &self,
        id: &NotionId,
        current_depth: usize,
    ) -> Result<BlockTree, AppError> {
        (**self).get_page_content(id, current_depth).await
    }
}

#[async_trait::async_trait]
impl<R: DatabaseRepository + ?Sized> DatabaseRepository for std::sync::Arc<R> {
    async fn get_database(&self, id: &NotionId) -> Result<Database, AppError> {
        (**self).get_database(id).await
    }

    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
    ) -> Result<Vec<Page>, AppError> {
        (**self).query_database(id, filter).await
    }
}

// src/api/repository.rs
//! Repository over a [`NotionTransport`]: pagination, depth-bounded tree
//! fetching and the mapping of wire values into domain types.

use super::pagination::fetch_all_pages;
use super::types::{FetchStep, PaginatedResponse};
use super::{DatabaseRepository, NotionTransport, PageRepository};
use crate::error::AppError;
use crate::model::{Block, BlockTree, BlockTreeBuilder, Database, FromWire, Page};
use crate::types::{MaxDepth, NotionId};
use serde_json::Value;

/// Fetches and maps Notion content through a transport.
pub struct NotionApiRepository<T> {
    transport: T,
    max_depth: MaxDepth,
}

impl<T: NotionTransport> NotionApiRepository<T> {
    /// Creates a repository with the default depth bound.
    pub fn new(transport: T) -> Self {
        Self::with_max_depth(transport, MaxDepth::default())
    }

    pub fn with_max_depth(transport: T, max_depth: MaxDepth) -> Self {
        Self {
            transport,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> MaxDepth {
        self.max_depth
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// All direct children of `id`, across every result page.
    async fn fetch_children(&self, id: &NotionId) -> Result<Vec<Block>, AppError> {
        let transport = &self.transport;
        let result = fetch_all_pages(|page_size, cursor| async move {
            let body = transport
                .get_block_children(id, cursor.as_deref(), page_size)
                .await?;
            PaginatedResponse::<Block>::from_wire(&body)
        })
        .await?;
        log::debug!("Fetched {} child blocks of {}", result.items.len(), id);
        Ok(result.items)
    }
}

#[async_trait::async_trait]
impl<T: NotionTransport> PageRepository for NotionApiRepository<T> {
    async fn get_page(&self, id: &NotionId) -> Result<Page, AppError> {
        log::info!("Fetching page {}", id);
        let body = self.transport.get_page(id).await?;
        Page::from_wire(&body)
    }

    /// Walks the block hierarchy depth-first with an explicit work stack.
    ///
    /// A fetch requested at `depth >= max_depth` is skipped with a warning
    /// and its block is recorded in [`BlockTree::truncated`]. Every block
    /// reporting `has_children` gets a fetch one level deeper.
    async fn get_page_content(
        &self,
        id: &NotionId,
        current_depth: usize,
    ) -> Result<BlockTree, AppError> {
        let max_depth = self.max_depth.get();
        let mut builder = BlockTreeBuilder::new();
        let mut stack = vec![FetchStep {
            block_id: id.clone(),
            parent: None,
            depth: current_depth,
        }];

        while let Some(step) = stack.pop() {
            if step.depth >= max_depth {
                log::warn!(
                    "Maximum recursion depth ({}) reached at block {}",
                    max_depth,
                    step.block_id
                );
                builder.mark_truncated(step.block_id);
                continue;
            }

            let children = self.fetch_children(&step.block_id).await?;

            let mut pending = Vec::new();
            for block in children {
                let descend = block.has_children.then(|| block.id.clone());
                let node = builder.insert(step.parent, block);
                if let Some(block_id) = descend {
                    pending.push(FetchStep {
                        block_id,
                        parent: Some(node),
                        depth: step.depth + 1,
                    });
                }
            }
            // Reversed so the first child is fetched next.
            stack.extend(pending.into_iter().rev());
        }

        let tree = builder.build();
        log::info!("Fetched {} blocks below {}", tree.len(), id);
        Ok(tree)
    }
}

#[async_trait::async_trait]
impl<T: NotionTransport> DatabaseRepository for NotionApiRepository<T> {
    async fn get_database(&self, id: &NotionId) -> Result<Database, AppError> {
        log::info!("Fetching database {}", id);
        let body = self.transport.get_database(id).await?;
        Database::from_wire(&body)
    }

    async fn query_database(
        &self,
        id: &NotionId,
        filter: Option<&Value>,
    ) -> Result<Vec<Page>, AppError> {
        let transport = &self.transport;
        let result = fetch_all_pages(|page_size, cursor| async move {
            let body = transport
                .query_database(id, filter, cursor.as_deref(), page_size)
                .await?;
            PaginatedResponse::<Page>::from_wire(&body)
        })
        .await?;
        log::info!("Database {} returned {} rows", id, result.items.len());
        Ok(result.items)
    }
}

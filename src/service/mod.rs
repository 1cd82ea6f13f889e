//! Application services: the public façade over the repositories.
//!
//! Inputs may be a full Notion URL or a bare ID. Anything containing
//! `notion.so` goes through [`extract_id`]; everything else is used as the
//! ID verbatim.

mod search;

pub use search::{BlockMatch, BlockMatcher};

use crate::api::{DatabaseRepository, PageRepository};
use crate::error::AppError;
use crate::model::{BlockTree, Database, Page};
use crate::types::{extract_id, looks_like_notion_url, NotionId};

/// Resolves a URL-or-ID input into a resource ID.
pub fn resolve_id(url_or_id: &str) -> Result<NotionId, AppError> {
    if looks_like_notion_url(url_or_id) {
        extract_id(url_or_id)
    } else {
        Ok(NotionId::new(url_or_id)?)
    }
}

/// A page together with its fetched block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWithContent {
    pub page: Page,
    pub content: BlockTree,
}

/// Page retrieval and search.
pub struct NotionPageService<R> {
    repository: R,
}

impl<R: PageRepository> NotionPageService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn get_page_by_url(&self, url: &str) -> Result<Page, AppError> {
        let id = extract_id(url)?;
        self.repository.get_page(&id).await
    }

    pub async fn get_page_content_by_url(&self, url: &str) -> Result<BlockTree, AppError> {
        let id = extract_id(url)?;
        self.repository.get_page_content(&id, 0).await
    }

    /// Fetches page metadata, then the block tree.
    pub async fn get_page_with_content(&self, url_or_id: &str) -> Result<PageWithContent, AppError> {
        let id = resolve_id(url_or_id)?;
        let page = self.repository.get_page(&id).await?;
        let content = self.repository.get_page_content(&id, 0).await?;
        Ok(PageWithContent { page, content })
    }

    /// Fetches the page's block tree and returns the blocks whose text
    /// contains `query`, ignoring case. An empty query returns no matches
    /// without fetching anything.
    pub async fn search_blocks(
        &self,
        query: &str,
        url_or_id: &str,
    ) -> Result<Vec<BlockMatch>, AppError> {
        let id = resolve_id(url_or_id)?;
        let Some(matcher) = BlockMatcher::new(query)? else {
            return Ok(Vec::new());
        };
        let tree = self.repository.get_page_content(&id, 0).await?;
        let matches = matcher.search(&tree);
        log::info!("Search for '{}' in {} found {} match(es)", query, id, matches.len());
        Ok(matches)
    }
}

/// Database retrieval.
pub struct NotionDatabaseService<R> {
    repository: R,
}

impl<R: DatabaseRepository> NotionDatabaseService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Fetches the database, then every row in server order.
    pub async fn get_database_with_rows(
        &self,
        url_or_id: &str,
    ) -> Result<(Database, Vec<Page>), AppError> {
        let id = resolve_id(url_or_id)?;
        let database = self.repository.get_database(&id).await?;
        let rows = self.repository.query_database(&id, None).await?;
        Ok((database, rows))
    }
}

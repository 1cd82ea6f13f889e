// src/api/pagination.rs
//! Cursor-following loop shared by every list endpoint.

use super::types::{PaginatedResponse, PaginationResult};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Calls `fetch_fn` with the page size and the current cursor until the
/// server reports no more results, concatenating results in order.
///
/// The loop stops when `has_more` is false or no `next_cursor` came back.
/// Any error aborts the whole walk.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_fn: F) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_fn(NOTION_API_PAGE_SIZE, cursor.take()).await?;
        pages_fetched += 1;

        all_items.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => break,
        }
    }

    log::debug!(
        "Fetched {} items across {} page(s)",
        all_items.len(),
        pages_fetched
    );

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}

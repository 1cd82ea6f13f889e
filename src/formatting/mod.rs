// src/formatting/mod.rs
//! Renders fetched Notion data for people and for tools.

pub mod block_renderer;
mod summary;

pub use block_renderer::{format_as_dict, format_as_text, tree_as_dicts};
pub use summary::{database_summary, page_summary, row_summary};

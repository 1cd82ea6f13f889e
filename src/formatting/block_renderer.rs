// src/formatting/block_renderer.rs
//! Block tree rendering: a JSON dictionary per block, or indented text.

use crate::constants::INDENT_SPACES;
use crate::error::AppError;
use crate::model::{BlockContent, BlockNode, BlockTree};
use serde_json::{json, Map, Value};
use std::fmt::{self, Write};

/// Renders one block and its subtree as
/// `{type, content?, language?, caption?, children?}`.
///
/// Text blocks carry `content`; code blocks add `language` and, when
/// non-empty, `caption`. `children` is present only when the block has
/// fetched children.
pub fn format_as_dict(node: BlockNode<'_>) -> Value {
    let block = node.block();
    let mut info = Map::new();
    info.insert("type".to_string(), json!(block.block_type.as_str()));

    match &block.content {
        BlockContent::Text(text) => {
            info.insert("content".to_string(), json!(text.plain_text()));
        }
        BlockContent::Code(code) => {
            info.insert("content".to_string(), json!(code.plain_text()));
            info.insert("language".to_string(), json!(code.language));
            let caption = code.caption_text();
            if !caption.is_empty() {
                info.insert("caption".to_string(), json!(caption));
            }
        }
        BlockContent::Generic => {}
    }

    if node.child_count() > 0 {
        let children: Vec<Value> = node.children().map(format_as_dict).collect();
        info.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(info)
}

/// Renders every root block of `tree` with [`format_as_dict`].
pub fn tree_as_dicts(tree: &BlockTree) -> Vec<Value> {
    tree.roots().map(format_as_dict).collect()
}

/// Renders the whole tree as text, one line per block, indented by depth.
pub fn format_as_text(tree: &BlockTree) -> Result<String, AppError> {
    let mut output = String::new();
    for node in tree.iter_depth_first() {
        write_block(&mut output, node)?;
    }
    Ok(output)
}

fn write_block(output: &mut String, node: BlockNode<'_>) -> fmt::Result {
    let indent = " ".repeat(node.depth() * INDENT_SPACES);
    let block = node.block();
    let block_type = block.block_type.as_str();

    match &block.content {
        BlockContent::Text(text) => {
            writeln!(output, "{}- {}: {}", indent, block_type, text.plain_text())?;
        }
        BlockContent::Code(code) => {
            writeln!(output, "{}- {} ({}):", indent, block_type, code.language)?;
            writeln!(output)?;
            writeln!(output, "{}```{}", indent, code.language)?;
            for line in code.plain_text().split('\n') {
                if line.trim().is_empty() {
                    writeln!(output)?;
                } else {
                    writeln!(output, "{}{}", indent, line)?;
                }
            }
            writeln!(output, "{}```", indent)?;
            writeln!(output)?;

            let caption = code.caption_text();
            if !caption.is_empty() {
                writeln!(output, "{}Caption: {}", indent, caption)?;
            }
        }
        BlockContent::Generic => {
            writeln!(output, "{}- {}", indent, block_type)?;
        }
    }
    Ok(())
}

//! Flat arena holding a fetched block hierarchy.
//!
//! Blocks are appended once, in fetch order, through [`BlockTreeBuilder`].
//! Parent/child links are indices into the arena, so the finished
//! [`BlockTree`] is immutable and cheap to traverse in any direction the
//! callers need.

use super::block::Block;
use crate::types::NotionId;
use indexmap::IndexMap;

/// Index of a block inside a [`BlockTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An immutable block hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockTree {
    blocks: Vec<Block>,
    children: Vec<Vec<NodeId>>,
    depths: Vec<usize>,
    roots: Vec<NodeId>,
    by_id: IndexMap<NotionId, NodeId>,
    truncated: Vec<NotionId>,
}

impl BlockTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Top-level blocks in page order.
    pub fn roots(&self) -> impl Iterator<Item = BlockNode<'_>> + '_ {
        self.roots.iter().map(move |&id| self.node(id))
    }

    pub fn node(&self, id: NodeId) -> BlockNode<'_> {
        BlockNode { tree: self, id }
    }

    /// Looks a block up by its Notion ID. When an ID occurs more than once
    /// (a synced block next to its original, or blocks without an ID), the
    /// first occurrence in fetch order is returned.
    pub fn get(&self, id: &NotionId) -> Option<BlockNode<'_>> {
        self.by_id.get(id).map(|&node| self.node(node))
    }

    /// Blocks whose children were left unfetched because the depth bound
    /// was reached.
    pub fn truncated(&self) -> &[NotionId] {
        &self.truncated
    }

    /// Pre-order traversal: each block, then its children, then its next
    /// sibling.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

/// A borrowed view of one block and its position in the tree.
#[derive(Debug, Clone, Copy)]
pub struct BlockNode<'a> {
    tree: &'a BlockTree,
    id: NodeId,
}

impl<'a> BlockNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn block(&self) -> &'a Block {
        &self.tree.blocks[self.id.0]
    }

    pub fn children(&self) -> impl Iterator<Item = BlockNode<'a>> + 'a {
        let tree = self.tree;
        tree.children[self.id.0]
            .iter()
            .map(move |&child| tree.node(child))
    }

    pub fn child_count(&self) -> usize {
        self.tree.children[self.id.0].len()
    }

    /// Zero for root blocks.
    pub fn depth(&self) -> usize {
        self.tree.depths[self.id.0]
    }
}

pub struct DepthFirst<'a> {
    tree: &'a BlockTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = BlockNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children[id.0].iter().rev().copied());
        Some(self.tree.node(id))
    }
}

/// Accumulates blocks while they are fetched. Consumed by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct BlockTreeBuilder {
    tree: BlockTree,
}

impl BlockTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `block` as the last child of `parent`, or as the last root.
    pub fn insert(&mut self, parent: Option<NodeId>, block: Block) -> NodeId {
        let id = NodeId(self.tree.blocks.len());
        let depth = match parent {
            Some(parent) => {
                self.tree.children[parent.0].push(id);
                self.tree.depths[parent.0] + 1
            }
            None => {
                self.tree.roots.push(id);
                0
            }
        };
        self.tree.by_id.entry(block.id.clone()).or_insert(id);
        self.tree.blocks.push(block);
        self.tree.children.push(Vec::new());
        self.tree.depths.push(depth);
        id
    }

    /// Records that `id`'s children were not fetched.
    pub fn mark_truncated(&mut self, id: NotionId) {
        self.tree.truncated.push(id);
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn build(self) -> BlockTree {
        self.tree
    }
}

//! Document model for a single note.
//!
//! This module handles:
//! - The block/inline tree ([`Document`], [`Block`], [`Inline`])
//! - Text editing primitives that keep runs normalized
//! - Loading and saving the HTML content string ([`html`])
//! - Markdown import and export ([`markdown`])

pub mod html;
pub mod markdown;
mod text;
mod types;

use serde::{Deserialize, Serialize};

pub use types::{Block, BlockId, BlockKind, Inline, InlineKind, ListKind, TYPING_ANCHOR};

/// An ordered sequence of blocks, exclusively owning all of them.
///
/// A document is never empty: it always holds at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A fresh note: one empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self::empty();
        doc.push_block(BlockKind::Paragraph, 0, Vec::new());
        doc
    }

    /// A document with no blocks yet; callers must push at least one and
    /// finish with [`Document::ensure_structure`].
    pub(crate) const fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            next_id: 1,
        }
    }

    const fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_at_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Append a block at the end of the document.
    pub(crate) fn push_block(
        &mut self,
        kind: BlockKind,
        indent: usize,
        inlines: Vec<Inline>,
    ) -> BlockId {
        let index = self.blocks.len();
        self.insert_block(index, kind, indent, inlines)
    }

    /// Insert a new block so that it ends up at `index`.
    pub(crate) fn insert_block(
        &mut self,
        index: usize,
        kind: BlockKind,
        indent: usize,
        inlines: Vec<Inline>,
    ) -> BlockId {
        let id = self.allocate_id();
        let index = index.min(self.blocks.len());
        self.blocks
            .insert(index, Block::new(id, kind, indent, inlines));
        id
    }

    /// Insert an empty paragraph right after `index`.
    pub(crate) fn insert_paragraph_after(&mut self, index: usize) -> BlockId {
        self.insert_block(index + 1, BlockKind::Paragraph, 0, Vec::new())
    }

    pub(crate) fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.index_of(id)?;
        Some(self.blocks.remove(index))
    }

    /// Restore structural invariants after bulk loading: the document is
    /// never empty and never ends on a thematic break.
    pub(crate) fn ensure_structure(&mut self) {
        let needs_paragraph = self
            .blocks
            .last()
            .is_none_or(|block| block.kind == BlockKind::ThematicBreak);
        if needs_paragraph {
            self.push_block(BlockKind::Paragraph, 0, Vec::new());
        }
    }

    /// Position of the list item at `index` within its numbered run (1-based).
    ///
    /// The run is the contiguous stretch of items above with the same list
    /// kind at the same indent; deeper items in between do not break it.
    pub fn list_ordinal(&self, index: usize) -> usize {
        let Some(block) = self.blocks.get(index) else {
            return 1;
        };
        let mut ordinal = 1;
        for prev in self.blocks[..index].iter().rev() {
            match prev.kind {
                BlockKind::ListItem(_) if prev.indent > block.indent => {}
                kind if kind == block.kind && prev.indent == block.indent => ordinal += 1,
                _ => break,
            }
        }
        ordinal
    }

    /// Ids of all notes referenced by mentions, in document order.
    pub fn mentions(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|block| block.inlines.iter())
            .filter_map(|inline| match &inline.kind {
                InlineKind::Mention { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain text of the whole note, one line per block, anchors removed.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text().replace(TYPING_ANCHOR, ""))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

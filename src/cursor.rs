//! Cursor model.
//!
//! A [`Cursor`] is a plain value: a block id plus a byte offset into that
//! block's logical text. It never holds a reference into the document, so
//! handlers that remove or split blocks recompute it before returning.

use serde::{Deserialize, Serialize};

use crate::document::{BlockId, Document};
use crate::error::{Error, Result};

/// Logical caret position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub block: BlockId,
    /// Byte offset into the block's logical text, on a char boundary.
    pub offset: usize,
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Cursor {
    pub const fn new(block: BlockId, offset: usize) -> Self {
        Self { block, offset }
    }

    /// Cursor at the very start of `block`.
    pub const fn at_start(block: BlockId) -> Self {
        Self::new(block, 0)
    }

    /// Cursor at the start of the first block.
    pub fn document_start(doc: &Document) -> Option<Self> {
        doc.first().map(|block| Self::at_start(block.id()))
    }

    /// Cursor at the end of the last block.
    pub fn document_end(doc: &Document) -> Option<Self> {
        doc.last().map(|block| Self::new(block.id(), block.len()))
    }

    /// Check that the cursor names a live block and a valid stop inside it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBlock`] when the block is gone and
    /// [`Error::OffsetOutOfBounds`] when the offset is past the end or not
    /// a valid stop.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        let block = doc
            .block(self.block)
            .ok_or(Error::UnknownBlock(self.block))?;
        if self.offset > block.len() || block.snap_offset(self.offset) != self.offset {
            return Err(Error::OffsetOutOfBounds {
                block: self.block,
                offset: self.offset,
                len: block.len(),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self, doc: &Document) -> bool {
        self.validate(doc).is_ok()
    }

    /// Nearest valid position: the offset is snapped into its block, and a
    /// cursor on a removed block falls back to the start of the document.
    pub fn clamped(self, doc: &Document) -> Self {
        match doc.block(self.block) {
            Some(block) => Self::new(self.block, block.snap_offset(self.offset)),
            None => Self::document_start(doc).unwrap_or(self),
        }
    }

    /// Move one step in `direction`.
    ///
    /// Left/Right cross block boundaries; Up/Down jump to the neighbouring
    /// block and keep the offset as far as that block allows.
    pub fn moved(self, doc: &Document, direction: Direction) -> Self {
        let cursor = self.clamped(doc);
        let Some(index) = doc.index_of(cursor.block) else {
            return cursor;
        };
        let Some(block) = doc.block_at(index) else {
            return cursor;
        };
        match direction {
            Direction::Left => match block.prev_stop(cursor.offset) {
                Some(offset) => Self::new(cursor.block, offset),
                None => index
                    .checked_sub(1)
                    .and_then(|prev| doc.block_at(prev))
                    .map_or(cursor, |prev| Self::new(prev.id(), prev.len())),
            },
            Direction::Right => match block.next_stop(cursor.offset) {
                Some(offset) => Self::new(cursor.block, offset),
                None => doc
                    .block_at(index + 1)
                    .map_or(cursor, |next| Self::at_start(next.id())),
            },
            Direction::Up => index
                .checked_sub(1)
                .and_then(|prev| doc.block_at(prev))
                .map_or(cursor, |prev| {
                    Self::new(prev.id(), prev.snap_offset(cursor.offset))
                }),
            Direction::Down => doc.block_at(index + 1).map_or(cursor, |next| {
                Self::new(next.id(), next.snap_offset(cursor.offset))
            }),
        }
    }

    /// Start of the current block (Home).
    pub const fn home(self) -> Self {
        Self::at_start(self.block)
    }

    /// End of the current block (End).
    pub fn end(self, doc: &Document) -> Self {
        doc.block(self.block)
            .map_or(self, |block| Self::new(self.block, block.len()))
    }
}

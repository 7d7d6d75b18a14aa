//! Error type shared by the library.

use crate::document::BlockId;

/// Errors surfaced by the editing engine.
///
/// Pattern matching and content loading never fail: unrecognized input
/// degrades to plain text instead. Errors only arise when a caller hands the
/// engine a position or snapshot it cannot honor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cursor referenced a block that is not part of the document.
    #[error("block {0} does not exist in this document")]
    UnknownBlock(BlockId),

    /// A cursor offset points past the end of its block or inside a character.
    #[error("offset {offset} is not a valid position in block {block} (length {len})")]
    OffsetOutOfBounds {
        block: BlockId,
        offset: usize,
        len: usize,
    },

    /// A JSON snapshot could not be encoded or decoded.
    #[error("snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Text and mention insertion, with live inline conversion.

use tracing::debug;

use crate::cursor::Cursor;
use crate::document::{Block, BlockKind, Document, Inline, InlineKind};
use crate::mention::active_query;
use crate::pattern::match_inline;

/// Insert typed text at the cursor, then convert an inline token the text
/// just closed.
pub(super) fn insert_text(doc: &mut Document, cursor: Cursor, text: &str) -> Option<Cursor> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if text.is_empty() {
        return None;
    }
    let block = doc.block_mut(cursor.block)?;
    if block.kind() == BlockKind::ThematicBreak {
        return None;
    }
    let offset = block.insert_text(cursor.offset, &text);
    if block.kind() == BlockKind::CodeBlock {
        return Some(Cursor::new(cursor.block, offset));
    }
    let offset = convert_inline(block, offset).unwrap_or(offset);
    Some(Cursor::new(cursor.block, offset))
}

/// Run the inline matcher on the plain run holding `offset`.
///
/// Returns the new cursor offset when a token was converted.
fn convert_inline(block: &mut Block, offset: usize) -> Option<usize> {
    let (index, local) = block.locate(offset);
    let run = block.inlines().get(index)?;
    if run.kind != InlineKind::Plain {
        return None;
    }
    let found = match_inline(&run.text, local)?;
    let start = block.run_start(index);
    let range = start + found.range.start..start + found.range.end;
    debug!(
        block = %block.id(),
        kind = ?found.kind,
        ?range,
        "converted inline token"
    );
    Some(block.replace_with_styled(range, found.kind, &found.inner))
}

/// Insert an opaque mention at the cursor.
pub(super) fn insert_mention(
    doc: &mut Document,
    cursor: Cursor,
    id: String,
    label: String,
) -> Option<Cursor> {
    if label.is_empty() {
        return None;
    }
    let block = doc.block_mut(cursor.block)?;
    if matches!(block.kind(), BlockKind::CodeBlock | BlockKind::ThematicBreak) {
        return None;
    }
    let mut offset = block.snap_offset(cursor.offset);
    if let Some((start, _)) = typed_query(block, offset) {
        block.delete_range(start..offset);
        offset = start;
    }
    debug!(block = %block.id(), note = %id, "inserted mention");
    let offset = block.insert_inline(offset, Inline::mention(id, label));
    Some(Cursor::new(cursor.block, offset))
}

/// The `@query` typed in the plain run before `offset`, with the block
/// offset of its trigger. A completed mention replaces it.
pub(super) fn typed_query(block: &Block, offset: usize) -> Option<(usize, &str)> {
    let (index, local) = block.locate(offset);
    let run = block.inlines().get(index)?;
    if run.kind != InlineKind::Plain {
        return None;
    }
    let (start, query) = active_query(&run.text, local)?;
    Some((block.run_start(index) + start, query))
}

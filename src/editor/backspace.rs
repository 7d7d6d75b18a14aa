//! Backspace and forward delete.

use tracing::debug;

use crate::cursor::Cursor;
use crate::document::{BlockKind, Document, Inline, TYPING_ANCHOR};

pub(super) fn backspace(doc: &mut Document, cursor: Cursor) -> Option<Cursor> {
    let index = doc.index_of(cursor.block)?;
    let block = doc.block_at_mut(index)?;
    if cursor.offset > 0 {
        let stop = block.prev_stop(cursor.offset)?;
        block.delete_range(stop..cursor.offset);
        return Some(Cursor::new(cursor.block, stop));
    }

    match block.kind() {
        BlockKind::Heading(_) | BlockKind::Blockquote | BlockKind::ListItem(_) | BlockKind::CodeBlock => {
            debug!(block = %cursor.block, from = block.kind().label(), "demoted block to paragraph");
            block.set_kind(BlockKind::Paragraph);
            Some(cursor)
        }
        BlockKind::ThematicBreak => remove_rule(doc, index),
        BlockKind::Paragraph => {
            let prev = index.checked_sub(1).and_then(|i| doc.block_at(i))?;
            if prev.kind() == BlockKind::ThematicBreak {
                let rule = prev.id();
                debug!(block = %rule, "removed rule above paragraph");
                doc.remove_block(rule);
                return Some(cursor);
            }
            merge_into_previous(doc, index)
        }
    }
}

/// Delete the character after the cursor, or pull the next block up.
pub(super) fn delete_forward(doc: &mut Document, cursor: Cursor) -> Option<Cursor> {
    let index = doc.index_of(cursor.block)?;
    let block = doc.block_at_mut(index)?;
    if block.kind() == BlockKind::ThematicBreak {
        return remove_rule(doc, index);
    }
    if let Some(stop) = block.next_stop(cursor.offset) {
        block.delete_range(cursor.offset..stop);
        return Some(cursor);
    }
    let next = doc.block_at(index + 1)?;
    if next.kind() == BlockKind::ThematicBreak {
        let rule = next.id();
        debug!(block = %rule, "removed rule below block");
        doc.remove_block(rule);
        doc.ensure_structure();
        return Some(cursor);
    }
    merge_into_previous(doc, index + 1)?;
    Some(cursor)
}

/// Remove the rule at `index`; the cursor lands at the start of what follows.
fn remove_rule(doc: &mut Document, index: usize) -> Option<Cursor> {
    let rule = doc.block_at(index)?.id();
    debug!(block = %rule, "removed rule");
    doc.remove_block(rule);
    doc.ensure_structure();
    let landing = doc.block_at(index).or_else(|| doc.last())?;
    Some(Cursor::at_start(landing.id()))
}

/// Append block `index` onto the block before it and remove it.
///
/// Returns the cursor at the join point.
fn merge_into_previous(doc: &mut Document, index: usize) -> Option<Cursor> {
    let prev_index = index.checked_sub(1)?;
    let current = doc.block_at(index)?.id();
    let removed = doc.remove_block(current)?;
    let prev = doc.block_at_mut(prev_index)?;
    let join = prev.len();
    if prev.kind() == BlockKind::CodeBlock {
        let text = removed.text().replace(TYPING_ANCHOR, "");
        prev.append_inlines(vec![Inline::plain(text)]);
    } else {
        prev.append_inlines(removed.inlines().to_vec());
    }
    debug!(block = %current, into = %prev.id(), "merged block into previous");
    Some(Cursor::new(prev.id(), join))
}

//! Enter: block conversion, list continuation and code-fence exit.

use tracing::debug;

use crate::cursor::Cursor;
use crate::document::{BlockKind, Document};
use crate::pattern::match_block;

pub(super) fn enter(doc: &mut Document, cursor: Cursor) -> Option<Cursor> {
    let index = doc.index_of(cursor.block)?;
    let kind = doc.block_at(index)?.kind();
    match kind {
        BlockKind::CodeBlock => code_block_enter(doc, index, cursor),
        BlockKind::ListItem(_) => list_item_enter(doc, index, cursor),
        BlockKind::ThematicBreak => {
            let id = doc.insert_paragraph_after(index);
            Some(Cursor::at_start(id))
        }
        BlockKind::Paragraph | BlockKind::Heading(_) | BlockKind::Blockquote => {
            convert_block(doc, index).or_else(|| split_block(doc, index, cursor))
        }
    }
}

/// A non-empty line gets a line break; an empty line leaves the block.
fn code_block_enter(doc: &mut Document, index: usize, cursor: Cursor) -> Option<Cursor> {
    let block = doc.block_at_mut(index)?;
    let text = block.text();
    let offset = cursor.offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    if line_start < line_end {
        let offset = block.insert_text(offset, "\n");
        return Some(Cursor::new(cursor.block, offset));
    }

    // Drop the empty line together with one of its line breaks.
    if line_start > 0 {
        block.delete_range(line_start - 1..line_start);
    } else if line_end < text.len() {
        block.delete_range(line_end..line_end + 1);
    }
    debug!(block = %cursor.block, "left code block");
    let id = doc.insert_paragraph_after(index);
    Some(Cursor::at_start(id))
}

/// A filled item is followed by a new empty one; an empty item leaves the
/// list for a paragraph after the run.
fn list_item_enter(doc: &mut Document, index: usize, cursor: Cursor) -> Option<Cursor> {
    let block = doc.block_at(index)?;
    let (kind, indent) = (block.kind(), block.indent());
    if !block.is_blank() {
        let id = doc.insert_block(index + 1, kind, indent, Vec::new());
        return Some(Cursor::at_start(id));
    }

    doc.remove_block(cursor.block)?;
    let end = run_end(doc, index, kind, indent);
    debug!(block = %cursor.block, at = end, "empty list item left the list");
    let id = doc.insert_block(end, BlockKind::Paragraph, 0, Vec::new());
    Some(Cursor::at_start(id))
}

/// Index just past the list run continuing at `from`: items of the same
/// kind, plus anything nested deeper than `indent`.
fn run_end(doc: &Document, from: usize, kind: BlockKind, indent: usize) -> usize {
    let mut end = from;
    while let Some(block) = doc.block_at(end) {
        let in_run =
            block.kind().is_list_item() && (block.kind() == kind || block.indent() > indent);
        if !in_run {
            break;
        }
        end += 1;
    }
    end
}

/// Convert the block when its text starts with a block marker.
fn convert_block(doc: &mut Document, index: usize) -> Option<Cursor> {
    let block = doc.block_at_mut(index)?;
    let conversion = match_block(&block.text())?;
    debug!(
        block = %block.id(),
        from = block.kind().label(),
        to = conversion.kind.label(),
        "converted block"
    );
    block.set_kind(conversion.kind);
    match conversion.kind {
        BlockKind::CodeBlock => {
            block.set_plain_text("");
            Some(Cursor::at_start(block.id()))
        }
        BlockKind::ThematicBreak => {
            block.set_plain_text("");
            let id = doc.insert_paragraph_after(index);
            Some(Cursor::at_start(id))
        }
        _ => {
            block.delete_range(0..conversion.marker_len);
            let id = doc.insert_paragraph_after(index);
            Some(Cursor::at_start(id))
        }
    }
}

/// Split at the cursor: the head keeps its kind, the tail is a paragraph.
fn split_block(doc: &mut Document, index: usize, cursor: Cursor) -> Option<Cursor> {
    let block = doc.block_at_mut(index)?;
    let tail = block.split_off(cursor.offset);
    let id = doc.insert_block(index + 1, BlockKind::Paragraph, 0, tail);
    Some(Cursor::at_start(id))
}

//! List indentation (Tab / Shift+Tab).

use tracing::debug;

use crate::cursor::Cursor;
use crate::document::Document;

pub(super) fn indent(doc: &mut Document, cursor: Cursor) -> Option<Cursor> {
    shift(doc, cursor, |indent| Some(indent + 1))
}

pub(super) fn outdent(doc: &mut Document, cursor: Cursor) -> Option<Cursor> {
    shift(doc, cursor, |indent| indent.checked_sub(1))
}

fn shift(doc: &mut Document, cursor: Cursor, step: impl Fn(usize) -> Option<usize>) -> Option<Cursor> {
    let block = doc.block_mut(cursor.block)?;
    if !block.kind().is_list_item() {
        return None;
    }
    let indent = step(block.indent())?;
    debug!(block = %cursor.block, from = block.indent(), to = indent, "changed list indent");
    block.set_indent(indent);
    Some(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::html;

    fn at(doc: &Document, index: usize) -> Cursor {
        Cursor::new(doc.block_at(index).unwrap().id(), 1)
    }

    #[test]
    fn test_tab_indents_list_item() {
        let mut doc = html::parse("<ul><li><p>a</p></li><li><p>b</p></li></ul>");
        let at_cursor = at(&doc, 1);
        let cursor = indent(&mut doc, at_cursor).unwrap();
        assert_eq!(cursor, at(&doc, 1));
        assert_eq!(doc.block_at(1).unwrap().indent(), 1);
        assert_eq!(doc.block_at(1).unwrap().text(), "b");
    }

    #[test]
    fn test_shift_tab_floors_at_zero() {
        let mut doc = html::parse("<ul><li><p>a</p></li></ul>");
        let at_cursor = at(&doc, 0);
        assert_eq!(outdent(&mut doc, at_cursor), None);
        let at_cursor = at(&doc, 0);
        indent(&mut doc, at_cursor).unwrap();
        let at_cursor = at(&doc, 0);
        outdent(&mut doc, at_cursor).unwrap();
        assert_eq!(doc.block_at(0).unwrap().indent(), 0);
    }

    #[test]
    fn test_tab_outside_list_is_noop() {
        let mut doc = html::parse("<p>a</p>");
        let at_cursor = at(&doc, 0);
        assert_eq!(indent(&mut doc, at_cursor), None);
        assert_eq!(doc.block_at(0).unwrap().indent(), 0);
    }
}

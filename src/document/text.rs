//! Text editing primitives on a single block.
//!
//! Offsets are byte offsets into the block's logical text and always sit on
//! a character boundary. Every mutation ends with [`Block::normalize`], so
//! callers never observe empty runs or two adjacent runs of the same kind.

use std::ops::Range;

use super::types::{Block, Inline, InlineKind, TYPING_ANCHOR};

/// Merge adjacent same-kind runs and drop empty ones.
///
/// A block whose runs are all empty keeps a single empty plain run.
pub(crate) fn normalize_inlines(inlines: &mut Vec<Inline>) {
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        if inline.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.merges_with(&inline) => last.text.push_str(&inline.text),
            _ => merged.push(inline),
        }
    }
    if merged.is_empty() {
        merged.push(Inline::plain(""));
    }
    *inlines = merged;
}

/// Largest char boundary of `text` that is `<= offset`.
pub(crate) fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

impl Block {
    pub(crate) fn normalize(&mut self) {
        normalize_inlines(&mut self.inlines);
    }

    /// Snap an offset onto a valid cursor stop: a char boundary that is not
    /// strictly inside a mention.
    pub fn snap_offset(&self, offset: usize) -> usize {
        let mut start = 0;
        for inline in &self.inlines {
            let end = start + inline.len();
            if offset > start && offset < end {
                if inline.kind.is_mention() {
                    return end;
                }
                return start + floor_boundary(&inline.text, offset - start);
            }
            start = end;
        }
        offset.min(start)
    }

    /// Run holding `offset` with left affinity, plus the offset local to it.
    ///
    /// A position on the boundary between two runs belongs to the run that
    /// ends there; offset 0 belongs to the first run.
    pub(crate) fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = self.snap_offset(offset);
        let mut start = 0;
        for (index, inline) in self.inlines.iter().enumerate() {
            let end = start + inline.len();
            if offset <= end {
                return (index, offset - start);
            }
            start = end;
        }
        let last = self.inlines.len().saturating_sub(1);
        (last, self.inlines.get(last).map_or(0, Inline::len))
    }

    /// Byte offset at which run `index` starts.
    pub(crate) fn run_start(&self, index: usize) -> usize {
        self.inlines.iter().take(index).map(Inline::len).sum()
    }

    /// Insert `text` at `offset` and return the offset just after it.
    ///
    /// Text joins the run ending at `offset`. Mentions are atomic: text next
    /// to a mention becomes (or joins) a neighbouring plain run instead.
    pub(crate) fn insert_text(&mut self, offset: usize, text: &str) -> usize {
        let offset = self.snap_offset(offset);
        if text.is_empty() {
            return offset;
        }
        let (index, local) = self.locate(offset);
        let target = &mut self.inlines[index];
        if target.kind.is_mention() {
            let at = if local == 0 { index } else { index + 1 };
            self.inlines.insert(at, Inline::plain(text));
        } else {
            target.text.insert_str(local, text);
        }
        self.normalize();
        offset + text.len()
    }

    /// Insert a whole run at `offset`, splitting whatever run sits there.
    pub(crate) fn insert_inline(&mut self, offset: usize, inline: Inline) -> usize {
        let offset = self.snap_offset(offset);
        let len = inline.len();
        let tail = self.split_off(offset);
        self.inlines.push(inline);
        self.inlines.extend(tail);
        self.normalize();
        offset + len
    }

    /// Remove the bytes in `range`, which may span several runs.
    ///
    /// A mention touched by the range is removed whole.
    pub(crate) fn delete_range(&mut self, range: Range<usize>) {
        let mut start = 0;
        for inline in &mut self.inlines {
            let end = start + inline.len();
            let cut_start = range.start.max(start);
            let cut_end = range.end.min(end);
            if cut_start < cut_end {
                if inline.kind.is_mention() {
                    inline.text.clear();
                } else {
                    let local_start = floor_boundary(&inline.text, cut_start - start);
                    let local_end = floor_boundary(&inline.text, cut_end - start);
                    inline.text.replace_range(local_start..local_end, "");
                }
            }
            start = end;
        }
        self.normalize();
    }

    /// Split the block at `offset`, keeping the head and returning the tail.
    ///
    /// The returned runs are normalized; an empty tail is a single empty
    /// plain run.
    pub(crate) fn split_off(&mut self, offset: usize) -> Vec<Inline> {
        let offset = self.snap_offset(offset);
        let mut tail = Vec::new();
        let mut head = Vec::new();
        let mut start = 0;
        for mut inline in self.inlines.drain(..) {
            let end = start + inline.len();
            if end <= offset {
                head.push(inline);
            } else if start >= offset {
                tail.push(inline);
            } else {
                let rest = inline.text.split_off(offset - start);
                tail.push(Inline::new(inline.kind.clone(), rest));
                head.push(inline);
            }
            start = end;
        }
        self.inlines = head;
        self.normalize();
        normalize_inlines(&mut tail);
        tail
    }

    /// Append runs to the end of the block, merging at the seam.
    pub(crate) fn append_inlines(&mut self, inlines: Vec<Inline>) {
        self.inlines.extend(inlines);
        self.normalize();
    }

    /// Replace everything with a single plain run.
    pub(crate) fn set_plain_text(&mut self, text: impl Into<String>) {
        self.inlines = vec![Inline::plain(text)];
        self.normalize();
    }

    /// Replace `range` with a styled run followed by a typing anchor.
    ///
    /// Returns the offset just after the anchor.
    pub(crate) fn replace_with_styled(
        &mut self,
        range: Range<usize>,
        kind: InlineKind,
        inner: &str,
    ) -> usize {
        let tail = self.split_off(range.end);
        self.delete_range(range.start..self.len());
        self.inlines.push(Inline::new(kind, inner));
        self.inlines.push(Inline::plain(TYPING_ANCHOR.to_string()));
        self.inlines.extend(tail);
        self.normalize();
        range.start + inner.len() + TYPING_ANCHOR.len_utf8()
    }

    /// Previous cursor stop before `offset`, stepping over typing anchors
    /// and whole mentions. `None` at the start of the block.
    pub fn prev_stop(&self, offset: usize) -> Option<usize> {
        let offset = self.snap_offset(offset);
        if offset == 0 {
            return None;
        }
        let (index, local) = self.locate(offset);
        let inline = &self.inlines[index];
        let run_start = offset - local;
        if inline.kind.is_mention() {
            return Some(run_start);
        }
        let mut stop = offset;
        let text = self.text();
        while let Some(c) = text[..stop].chars().next_back() {
            stop -= c.len_utf8();
            if c != TYPING_ANCHOR {
                break;
            }
        }
        Some(self.snap_offset(stop))
    }

    /// Next cursor stop after `offset`. `None` at the end of the block.
    pub fn next_stop(&self, offset: usize) -> Option<usize> {
        let offset = self.snap_offset(offset);
        if offset >= self.len() {
            return None;
        }
        let mut start = 0;
        for inline in &self.inlines {
            let end = start + inline.len();
            if offset >= start && offset < end && inline.kind.is_mention() {
                return Some(end);
            }
            start = end;
        }
        let text = self.text();
        let mut stop = offset;
        for c in text[offset..].chars() {
            stop += c.len_utf8();
            if c != TYPING_ANCHOR {
                break;
            }
        }
        Some(stop)
    }
}

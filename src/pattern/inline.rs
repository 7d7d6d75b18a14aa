//! Inline pattern matcher.
//!
//! Recognizes closed `**bold**`, `__bold__`, `*italic*`, `_italic_`,
//! `~~strike~~` and `` `code` `` tokens. Delimiters are tried in a fixed
//! order and each accepted token consumes its range, so a later pass never
//! re-matches inside it: code spans shield their contents, and bold markers
//! are never read as two italic markers.

use std::ops::Range;

use tracing::trace;

use crate::document::{InlineKind, TYPING_ANCHOR};

/// A closed inline token found in a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// Byte range of the whole token, markers included.
    pub range: Range<usize>,
    pub kind: InlineKind,
    /// Text between the markers.
    pub inner: String,
}

struct Delimiter {
    marker: &'static str,
    kind: InlineKind,
}

impl Delimiter {
    /// Flanking rules apply to everything but code spans, whose content is
    /// taken verbatim.
    fn flanking(&self) -> bool {
        self.kind != InlineKind::Code
    }

    fn single(&self) -> bool {
        self.marker.len() == 1 && self.kind != InlineKind::Code
    }

    fn underscore(&self) -> bool {
        self.marker.starts_with('_')
    }
}

const DELIMITERS: [Delimiter; 6] = [
    Delimiter {
        marker: "`",
        kind: InlineKind::Code,
    },
    Delimiter {
        marker: "**",
        kind: InlineKind::Bold,
    },
    Delimiter {
        marker: "__",
        kind: InlineKind::Bold,
    },
    Delimiter {
        marker: "~~",
        kind: InlineKind::Strikethrough,
    },
    Delimiter {
        marker: "*",
        kind: InlineKind::Italic,
    },
    Delimiter {
        marker: "_",
        kind: InlineKind::Italic,
    },
];

/// Find the token the user just closed.
///
/// Only a token whose closing marker ends exactly at `cursor` is returned;
/// tokens elsewhere in the text are left alone so conversion never happens
/// retroactively.
pub fn match_inline(text: &str, cursor: usize) -> Option<InlineMatch> {
    let found = tokens(text).into_iter().find(|token| token.range.end == cursor);
    match &found {
        Some(token) => trace!(range = ?token.range, kind = ?token.kind, "inline token closed"),
        None => trace!(cursor, "no inline token closes at cursor"),
    }
    found
}

/// All closed tokens in `text`, ordered by start offset.
pub fn tokens(text: &str) -> Vec<InlineMatch> {
    let mut consumed: Vec<Range<usize>> = Vec::new();
    let mut found = Vec::new();
    for delimiter in &DELIMITERS {
        let width = delimiter.marker.len();
        let mut from = 0;
        while let Some(open) = find_opener(text, delimiter, from, &consumed) {
            from = open + 1;
            let Some(close) = find_closer(text, delimiter, open + width, &consumed) else {
                continue;
            };
            let range = open..close + width;
            if overlaps(&consumed, &range) {
                continue;
            }
            let inner = &text[open + width..close];
            if inner.chars().all(|c| c == TYPING_ANCHOR) {
                continue;
            }
            // Code spans end at the first backtick.
            if delimiter.kind == InlineKind::Code && inner.contains('`') {
                continue;
            }
            consumed.push(range.clone());
            from = range.end;
            found.push(InlineMatch {
                range,
                kind: delimiter.kind.clone(),
                inner: inner.replace(TYPING_ANCHOR, ""),
            });
        }
    }
    found.sort_by_key(|token| token.range.start);
    found
}

fn find_opener(
    text: &str,
    delimiter: &Delimiter,
    from: usize,
    consumed: &[Range<usize>],
) -> Option<usize> {
    candidates(text, delimiter.marker, from).find(|&pos| {
        let after = pos + delimiter.marker.len();
        marker_free(text, delimiter, pos, consumed)
            && (!delimiter.flanking() || next_char(text, after).is_some_and(|c| !c.is_whitespace()))
            && (!delimiter.underscore()
                || prev_char(text, pos).is_none_or(|c| !c.is_alphanumeric()))
    })
}

fn find_closer(
    text: &str,
    delimiter: &Delimiter,
    inner_start: usize,
    consumed: &[Range<usize>],
) -> Option<usize> {
    candidates(text, delimiter.marker, inner_start).find(|&pos| {
        let after = pos + delimiter.marker.len();
        pos > inner_start
            && marker_free(text, delimiter, pos, consumed)
            && (!delimiter.flanking() || prev_char(text, pos).is_some_and(|c| !c.is_whitespace()))
            && (!delimiter.underscore()
                || next_char(text, after).is_none_or(|c| !c.is_alphanumeric()))
    })
}

/// Every position at or after `from` where `marker` occurs, overlapping
/// occurrences included.
fn candidates<'a>(text: &'a str, marker: &'a str, from: usize) -> impl Iterator<Item = usize> + 'a {
    text.char_indices()
        .map(|(pos, _)| pos)
        .filter(move |&pos| pos >= from && text[pos..].starts_with(marker))
}

/// The marker at `pos` sits outside consumed ranges and, for single-char
/// markers, is not half of a doubled one.
fn marker_free(text: &str, delimiter: &Delimiter, pos: usize, consumed: &[Range<usize>]) -> bool {
    let range = pos..pos + delimiter.marker.len();
    if overlaps(consumed, &range) {
        return false;
    }
    if delimiter.single() {
        let mark = delimiter.marker.chars().next();
        if prev_char(text, pos) == mark || next_char(text, range.end) == mark {
            return false;
        }
    }
    true
}

fn overlaps(consumed: &[Range<usize>], range: &Range<usize>) -> bool {
    consumed
        .iter()
        .any(|taken| taken.start < range.end && range.start < taken.end)
}

fn prev_char(text: &str, pos: usize) -> Option<char> {
    text[..pos].chars().next_back()
}

fn next_char(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

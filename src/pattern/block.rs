//! Block pattern matcher.
//!
//! Runs once per committed line (Enter) against the whole block text. The
//! first rule in [`RULES`] that matches wins.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{trace, warn};

use crate::document::{BlockKind, ListKind, TYPING_ANCHOR};

/// Verdict for a line that carries a block marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConversion {
    pub kind: BlockKind,
    /// Bytes of leading marker to strip, trailing space included.
    pub marker_len: usize,
    /// Text after the marker, or `None` for markers that take the whole
    /// line (code fence and rule).
    pub content: Option<String>,
}

struct Rule {
    regex: Regex,
    kind: fn(&Captures<'_>) -> BlockKind,
    /// Index of the capture group holding the content, if any.
    content_group: Option<usize>,
}

impl Rule {
    fn new(
        pattern: &str,
        kind: fn(&Captures<'_>) -> BlockKind,
        content_group: Option<usize>,
    ) -> Option<Self> {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                warn!(pattern, error = %err, "block rule dropped: pattern does not compile");
                return None;
            }
        };
        Some(Self {
            regex,
            kind,
            content_group,
        })
    }
}

fn heading_level(caps: &Captures<'_>) -> BlockKind {
    let hashes = caps.get(1).map_or(1, |m| m.len());
    BlockKind::Heading(u8::try_from(hashes).unwrap_or(6))
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        Rule::new(r"^(#{1,6})\s(.*)$", heading_level, Some(2)),
        Rule::new(r"^>\s(.*)$", |_| BlockKind::Blockquote, Some(1)),
        Rule::new(r"^[-*]\s(.*)$", |_| BlockKind::ListItem(ListKind::Bullet), Some(1)),
        Rule::new(r"^\d+\.\s(.*)$", |_| BlockKind::ListItem(ListKind::Ordered), Some(1)),
        Rule::new(r"^```$", |_| BlockKind::CodeBlock, None),
        Rule::new(r"^---$", |_| BlockKind::ThematicBreak, None),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Match a block's text against the marker table.
///
/// A marker must be followed by whitespace and non-empty content, so
/// `#tag` or a lone `- ` stay literal text.
pub fn match_block(original: &str) -> Option<BlockConversion> {
    // Typing anchors are invisible and never part of a marker.
    let stripped = original.replace(TYPING_ANCHOR, "");
    let text = stripped.as_str();
    for rule in RULES.iter() {
        let Some(caps) = rule.regex.captures(text) else {
            continue;
        };
        let kind = (rule.kind)(&caps);
        let conversion = match rule.content_group.and_then(|group| caps.get(group)) {
            Some(content) => {
                if content.as_str().trim().is_empty() {
                    trace!(kind = kind.label(), "block marker without content");
                    return None;
                }
                BlockConversion {
                    kind,
                    marker_len: original_offset(original, content.start()),
                    content: Some(content.as_str().to_string()),
                }
            }
            None => BlockConversion {
                kind,
                marker_len: original.len(),
                content: None,
            },
        };
        return Some(conversion);
    }
    trace!("no block marker");
    None
}

/// Map an offset in anchor-free text back onto `original`.
fn original_offset(original: &str, stripped: usize) -> usize {
    let mut seen = 0;
    for (pos, c) in original.char_indices() {
        if seen >= stripped {
            return pos;
        }
        if c != TYPING_ANCHOR {
            seen += c.len_utf8();
        }
    }
    original.len()
}

//! Core document types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-width joiner inserted after a freshly converted inline span.
///
/// Text typed after a conversion lands in the plain run that starts with
/// this anchor instead of extending the styled span.
pub const TYPING_ANCHOR: char = '\u{200D}';

/// Opaque, document-unique block identity.
///
/// Ids are never reused within a document, so a stale id can be detected
/// rather than silently pointing at a different block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub(crate) u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bullet (`- item`) or ordered (`1. item`) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    /// Heading level, 1 through 6.
    Heading(u8),
    Blockquote,
    ListItem(ListKind),
    /// Fenced code; lines are separated by `\n` inside a single plain inline.
    CodeBlock,
    ThematicBreak,
}

impl BlockKind {
    pub const fn is_list_item(self) -> bool {
        matches!(self, Self::ListItem(_))
    }

    /// Short human-readable label, used by status lines and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading(1) => "heading 1",
            Self::Heading(2) => "heading 2",
            Self::Heading(3) => "heading 3",
            Self::Heading(4) => "heading 4",
            Self::Heading(5) => "heading 5",
            Self::Heading(_) => "heading 6",
            Self::Blockquote => "quote",
            Self::ListItem(ListKind::Bullet) => "bullet item",
            Self::ListItem(ListKind::Ordered) => "numbered item",
            Self::CodeBlock => "code",
            Self::ThematicBreak => "rule",
        }
    }
}

/// Styling of an inline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineKind {
    Plain,
    Bold,
    Italic,
    Strikethrough,
    Code,
    /// Reference to another note, registered by the host.
    ///
    /// The engine never interprets the id and never merges two mentions,
    /// even when they point at the same note.
    Mention { id: String },
}

impl InlineKind {
    pub const fn is_mention(&self) -> bool {
        matches!(self, Self::Mention { .. })
    }
}

/// A styled run of text inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inline {
    pub kind: InlineKind,
    pub text: String,
}

impl Inline {
    pub fn new(kind: InlineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(InlineKind::Plain, text)
    }

    pub fn mention(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(InlineKind::Mention { id: id.into() }, label)
    }

    /// Whether `next` may be folded into this run.
    pub fn merges_with(&self, next: &Self) -> bool {
        self.kind == next.kind && !self.kind.is_mention()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One structural unit of a note: a paragraph, heading, list item, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub(crate) id: BlockId,
    pub(crate) kind: BlockKind,
    pub(crate) indent: usize,
    pub(crate) inlines: Vec<Inline>,
}

impl Block {
    pub(crate) fn new(id: BlockId, kind: BlockKind, indent: usize, inlines: Vec<Inline>) -> Self {
        let mut block = Self {
            id,
            kind,
            indent: if kind.is_list_item() { indent } else { 0 },
            inlines,
        };
        block.normalize();
        block
    }

    pub const fn id(&self) -> BlockId {
        self.id
    }

    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Nesting depth; always 0 for anything but list items.
    pub const fn indent(&self) -> usize {
        self.indent
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// Change the block kind, dropping indentation when it no longer applies.
    pub(crate) const fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
        if !kind.is_list_item() {
            self.indent = 0;
        }
    }

    pub(crate) const fn set_indent(&mut self, indent: usize) {
        if self.kind.is_list_item() {
            self.indent = indent;
        }
    }

    /// The block's logical text: all inline runs concatenated in order.
    pub fn text(&self) -> String {
        self.inlines.iter().map(|inline| inline.text.as_str()).collect()
    }

    /// Length of the logical text in bytes.
    pub fn len(&self) -> usize {
        self.inlines.iter().map(Inline::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inlines.iter().all(Inline::is_empty)
    }

    /// True when the block holds nothing but typing anchors.
    pub fn is_blank(&self) -> bool {
        self.inlines
            .iter()
            .all(|inline| inline.text.chars().all(|c| c == TYPING_ANCHOR))
    }
}

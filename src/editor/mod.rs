//! Editing session: one document, one cursor, one stream of intents.
//!
//! The [`Editor`] owns its [`Document`] and [`Cursor`]. A host translates
//! keystrokes into [`Intent`]s and calls [`Editor::apply`] for each; every
//! intent is processed to completion before the next. Handlers receive the
//! document mutably and the cursor by value, and return the cursor to use
//! afterwards, so a cursor can never point at a block a handler removed.

mod backspace;
mod enter;
mod insert;
mod tab;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::{Cursor, Direction};
use crate::document::{Block, BlockId, Document, html, markdown};
use crate::error::Result;

/// A discrete edit request from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Text typed or pasted at the cursor.
    InsertText(String),
    Enter,
    Backspace,
    /// Delete the character after the cursor (the Delete key).
    DeleteForward,
    Tab,
    ShiftTab,
    /// Insert a reference to another note.
    InsertMention { id: String, label: String },
    Move(Direction),
    Home,
    End,
    MoveTo(Cursor),
}

impl Intent {
    /// Whether the intent may change the document. Locked sessions reject
    /// these and still honor cursor movement.
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::Move(_) | Self::Home | Self::End | Self::MoveTo(_))
    }
}

/// Result of applying one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The document changed.
    pub changed: bool,
    /// Where the host should place the caret.
    pub cursor: Cursor,
}

/// Called with the serialized content after each intent that changed the
/// document.
pub type ChangeCallback = Box<dyn FnMut(&str)>;

/// An editing session over one note.
pub struct Editor {
    document: Document,
    cursor: Cursor,
    locked: bool,
    dirty: bool,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("cursor", &self.cursor)
            .field("locked", &self.locked)
            .field("dirty", &self.dirty)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// A session over a fresh, empty note.
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    /// A session over an existing document, cursor at its start.
    pub fn from_document(mut document: Document) -> Self {
        document.ensure_structure();
        let cursor = Cursor::document_start(&document).unwrap_or(Cursor::at_start(BlockId(0)));
        Self {
            document,
            cursor,
            locked: false,
            dirty: false,
            on_change: None,
        }
    }

    /// Load a note from its HTML content string.
    pub fn from_html(content: &str) -> Self {
        Self::from_document(html::parse(content))
    }

    /// Load a note from Markdown source.
    pub fn from_markdown(source: &str) -> Self {
        Self::from_document(markdown::from_markdown(source))
    }

    /// Restore a session from a snapshot, clamping a stale cursor.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut editor = Self::from_document(snapshot.document);
        editor.cursor = snapshot.cursor.clamped(&editor.document);
        editor
    }

    #[must_use]
    pub fn with_on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The block holding the cursor.
    pub fn current_block(&self) -> Option<&Block> {
        self.document.block(self.cursor.block)
    }

    /// The `@query` being typed just before the cursor, if any.
    pub fn mention_query(&self) -> Option<&str> {
        let block = self.current_block()?;
        insert::typed_query(block, self.cursor.offset).map(|(_, query)| query)
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        debug!(locked, "editor lock changed");
        self.locked = locked;
    }

    /// Whether the document changed since load or the last [`Editor::mark_clean`].
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Current content string.
    pub fn html(&self) -> String {
        html::serialize(&self.document)
    }

    pub fn markdown(&self) -> String {
        markdown::to_markdown(&self.document)
    }

    /// Place the cursor explicitly.
    ///
    /// # Errors
    ///
    /// Fails when the cursor does not name a live block and valid offset.
    pub fn set_cursor(&mut self, cursor: Cursor) -> Result<()> {
        cursor.validate(&self.document)?;
        self.cursor = cursor;
        Ok(())
    }

    /// Apply one intent and report what happened.
    pub fn apply(&mut self, intent: Intent) -> Outcome {
        let cursor = self.cursor.clamped(&self.document);
        if self.locked && intent.is_mutating() {
            trace!(?intent, "editor locked, intent ignored");
            self.cursor = cursor;
            return Outcome {
                changed: false,
                cursor,
            };
        }
        let doc = &mut self.document;
        let edited = match intent {
            Intent::InsertText(text) => insert::insert_text(doc, cursor, &text),
            Intent::InsertMention { id, label } => insert::insert_mention(doc, cursor, id, label),
            Intent::Enter => enter::enter(doc, cursor),
            Intent::Backspace => backspace::backspace(doc, cursor),
            Intent::DeleteForward => backspace::delete_forward(doc, cursor),
            Intent::Tab => tab::indent(doc, cursor),
            Intent::ShiftTab => tab::outdent(doc, cursor),
            Intent::Move(direction) => {
                self.cursor = cursor.moved(doc, direction);
                None
            }
            Intent::Home => {
                self.cursor = cursor.home();
                None
            }
            Intent::End => {
                self.cursor = cursor.end(doc);
                None
            }
            Intent::MoveTo(target) => {
                self.cursor = target.clamped(doc);
                None
            }
        };
        let changed = edited.is_some();
        if let Some(next) = edited {
            self.cursor = next.clamped(&self.document);
            self.dirty = true;
            if let Some(callback) = self.on_change.as_mut() {
                callback(&html::serialize(&self.document));
            }
        }
        Outcome {
            changed,
            cursor: self.cursor,
        }
    }

    /// Read-only copy for autosave, export or debugging.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            cursor: self.cursor,
        }
    }
}

/// Detached copy of a session's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub document: Document,
    pub cursor: Cursor,
}

impl Snapshot {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns an error if `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::document::BlockKind;
    use crate::error::Error;

    fn type_text(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            editor.apply(Intent::InsertText(c.to_string()));
        }
    }

    #[test]
    fn test_new_editor_starts_in_empty_paragraph() {
        let editor = Editor::new();
        assert_eq!(editor.html(), "<p></p>");
        assert_eq!(editor.cursor().offset, 0);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_on_change_receives_serialized_content() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut editor = Editor::new().with_on_change(move |html| sink.borrow_mut().push(html.to_string()));
        type_text(&mut editor, "hi");
        assert_eq!(*seen.borrow(), vec!["<p>h</p>", "<p>hi</p>"]);
    }

    #[test]
    fn test_on_change_skips_unchanged_intents() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut editor = Editor::new().with_on_change(move |_| *counter.borrow_mut() += 1);
        editor.apply(Intent::Backspace);
        editor.apply(Intent::Move(Direction::Left));
        editor.apply(Intent::Tab);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_locked_editor_rejects_edits_but_moves() {
        let mut editor = Editor::from_html("<p>abc</p>");
        editor.set_locked(true);
        let outcome = editor.apply(Intent::InsertText("x".into()));
        assert!(!outcome.changed);
        assert_eq!(editor.html(), "<p>abc</p>");
        editor.apply(Intent::End);
        assert_eq!(editor.cursor().offset, 3);
        editor.set_locked(false);
        editor.apply(Intent::InsertText("d".into()));
        assert_eq!(editor.html(), "<p>abcd</p>");
    }

    #[test]
    fn test_live_bold_conversion() {
        let mut editor = Editor::new();
        type_text(&mut editor, "**a** b");
        assert_eq!(editor.html(), "<p><strong>a</strong> b</p>");
        assert_eq!(editor.document().plain_text(), "a b");
    }

    #[test]
    fn test_set_cursor_rejects_unknown_block() {
        let mut editor = Editor::new();
        let result = editor.set_cursor(Cursor::new(BlockId(404), 0));
        assert!(matches!(result, Err(Error::UnknownBlock(_))));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut editor = Editor::from_html("<h1>Title</h1><ul><li><p>one</p></li></ul>");
        editor.apply(Intent::Move(Direction::Down));
        let json = editor.snapshot().to_json().unwrap();
        let restored = Editor::from_snapshot(Snapshot::from_json(&json).unwrap());
        assert_eq!(restored.document(), editor.document());
        assert_eq!(restored.cursor(), editor.cursor());
    }

    #[test]
    fn test_dirty_flag_tracks_edits() {
        let mut editor = Editor::new();
        type_text(&mut editor, "x");
        assert!(editor.is_dirty());
        editor.mark_clean();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_move_to_clamps_into_document() {
        let mut editor = Editor::from_html("<p>ab</p>");
        let block = editor.current_block().unwrap().id();
        let outcome = editor.apply(Intent::MoveTo(Cursor::new(block, 50)));
        assert_eq!(outcome.cursor.offset, 2);
        assert_eq!(editor.current_block().unwrap().kind(), BlockKind::Paragraph);
    }

    #[test]
    fn test_mention_query_follows_typing() {
        let mut editor = Editor::new();
        type_text(&mut editor, "see @gro");
        assert_eq!(editor.mention_query(), Some("gro"));
        type_text(&mut editor, " ");
        assert_eq!(editor.mention_query(), None);
    }
}

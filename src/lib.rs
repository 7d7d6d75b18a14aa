// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. document::DocumentRenderer)
    clippy::module_name_repetitions
)]

//! # Livemark
//!
//! A live-converting rich-text note editor engine.
//!
//! Markdown-like syntax typed into a note is turned into structure as the
//! user types: `## ` becomes a heading on Enter, `**bold**` becomes bold the
//! moment the closing marker lands, `- ` starts a list. Notes load from and
//! save to an HTML content string, with Markdown import and export on the side.
//!
//! ## Architecture
//!
//! The engine is a single-threaded state machine:
//! - **Document**: ordered blocks of styled inline runs
//! - **Cursor**: a block id plus a byte offset, never a reference
//! - **Intent**: one discrete edit request, processed to completion
//! - **Editor**: owns both and dispatches intents to the edit handlers
//!
//! The bundled terminal host follows The Elm Architecture (TEA), mapping
//! keystrokes to intents and drawing the document with ratatui.
//!
//! ## Modules
//!
//! - [`document`]: Document model, HTML and Markdown formats
//! - [`cursor`]: Cursor model and navigation
//! - [`pattern`]: Inline and block Markdown recognition
//! - [`editor`]: Editing session and edit handlers
//! - [`render`]: Read-only projections of a document
//! - [`mention`]: Cross-references to other notes
//! - [`app`]: Terminal host event loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod mention;
pub mod pattern;
pub mod render;
pub mod ui;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cursor::{Cursor, Direction};
    pub use crate::document::{Block, BlockId, BlockKind, Document, Inline, InlineKind, ListKind};
    pub use crate::editor::{Editor, Intent, Outcome, Snapshot};
    pub use crate::mention::{MentionRegistry, NoteTarget};
    pub use crate::render::{DocumentRenderer, HtmlRenderer, MarkdownRenderer};
}

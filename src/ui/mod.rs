//! Terminal UI components.
//!
//! - [`viewport`]: Scroll window that follows the caret
//! - [`style`]: Theming and colors
//! - [`TerminalRenderer`]: Document to styled rows, with the caret position

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{RenderedDocument, TerminalRenderer, render};
pub use status::{status_text, suggestion_text};

/// Columns left blank to the left of the note.
pub const DOCUMENT_LEFT_PADDING: u16 = 2;

#[cfg(test)]
mod tests;

//! Terminal host for the editor.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Keystrokes become [`crate::editor::Intent`]s; the engine does the editing.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, NoteFormat, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::ThemeMode;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    file_path: Option<PathBuf>,
    markdown: bool,
    read_only: bool,
    theme: ThemeMode,
}

impl App {
    /// Create a new application for the given note; `None` edits a scratch note.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            markdown: false,
            read_only: false,
            theme: ThemeMode::Auto,
        }
    }

    /// Read and save the note as Markdown instead of HTML.
    #[must_use]
    pub const fn with_markdown(mut self, enabled: bool) -> Self {
        self.markdown = enabled;
        self
    }

    /// Start locked.
    #[must_use]
    pub const fn with_read_only(mut self, enabled: bool) -> Self {
        self.read_only = enabled;
        self
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests;

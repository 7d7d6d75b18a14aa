use tracing::trace;

use crate::app::{Model, ToastLevel};
use crate::editor::Intent;

/// All possible messages in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// An edit or caret move forwarded to the editor
    Edit(Intent),
    /// Insert the n-th mention suggestion (0-based)
    AcceptMention(usize),
    /// Toggle the read-only lock
    ToggleLock,
    /// Save the note to its file
    Save,

    // Navigation
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Writing
/// the file on [`Message::Save`] is a side effect and happens in the event
/// loop after this returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save keeps a pending quit armed so Ctrl+S then Ctrl+Q still works.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_armed = false;
    }

    match msg {
        Message::Edit(intent) => {
            let mutating = intent.is_mutating();
            let outcome = model.editor.apply(intent);
            if mutating && !outcome.changed && model.editor.is_locked() {
                model.show_toast(ToastLevel::Warning, "Note is locked (Ctrl+L to unlock)");
            }
            trace!(changed = outcome.changed, cursor = ?outcome.cursor, "edit applied");
        }
        Message::AcceptMention(index) => {
            let intent = model
                .mention_suggestions()
                .get(index)
                .map(|target| target.intent());
            if let Some(intent) = intent {
                model.editor.apply(intent);
            }
        }
        Message::ToggleLock => {
            let locked = !model.editor.is_locked();
            model.editor.set_locked(locked);
            let text = if locked { "Locked" } else { "Unlocked" };
            model.show_toast(ToastLevel::Info, text);
        }

        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),

        Message::Resize(_, height) => {
            model.viewport.resize(height.saturating_sub(1));
        }

        Message::Quit => {
            if model.editor.is_dirty() && !model.quit_armed {
                model.quit_armed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes: Ctrl+S to save, Ctrl+Q again to discard",
                );
            } else {
                model.should_quit = true;
            }
        }

        Message::Save | Message::Redraw => {}
    }

    model
}

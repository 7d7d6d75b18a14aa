use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

/// Status bar text: file, block kind, lock and dirty state.
pub fn status_text(model: &Model) -> String {
    let kind = model
        .editor
        .current_block()
        .map_or("", |block| block.kind().label());
    let lock = if model.editor.is_locked() { " [locked]" } else { "" };
    let dirty = if model.editor.is_dirty() { " [modified]" } else { "" };
    format!(
        " {}  {}{}{}  ^S:save ^L:lock ^Q:quit",
        model.display_name(),
        kind,
        lock,
        dirty
    )
}

/// Mention suggestions for the `@query` under the caret, numbered for Alt+n.
pub fn suggestion_text(model: &Model) -> Option<String> {
    let suggestions = model.mention_suggestions();
    if suggestions.is_empty() {
        return None;
    }
    let items: Vec<String> = suggestions
        .iter()
        .enumerate()
        .map(|(i, target)| format!("M-{} {}", i + 1, target.title))
        .collect();
    Some(format!(" @ {}", items.join("  ")))
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = model.theme;
    let (text, style) = if let Some((message, level)) = model.active_toast() {
        let (prefix, style) = match level {
            ToastLevel::Info => ("[info]", theme.status()),
            ToastLevel::Warning => ("[warn]", theme.status_locked()),
            ToastLevel::Error => ("[error]", theme.status_error()),
        };
        (format!(" {prefix} {message}"), style)
    } else if let Some(suggestions) = suggestion_text(model) {
        (suggestions, theme.status())
    } else if model.editor.is_locked() {
        (status_text(model), theme.status_locked())
    } else {
        (status_text(model), theme.status())
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

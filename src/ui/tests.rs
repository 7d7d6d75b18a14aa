use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::text::Line;

use super::*;
use crate::app::{Model, NoteFormat};
use crate::cursor::Cursor;
use crate::document::{Document, html};
use crate::editor::{Editor, Intent};
use crate::mention::NoteTarget;
use crate::render::DocumentRenderer;
use crate::ui::style::Theme;

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn rows(doc: &Document, width: u16) -> Vec<String> {
    TerminalRenderer::new(Theme::dark(), width)
        .render(doc)
        .lines
        .iter()
        .map(line_text)
        .collect()
}

fn caret(doc: &Document, cursor: Cursor, width: u16) -> Option<(usize, u16)> {
    TerminalRenderer::new(Theme::dark(), width)
        .with_cursor(cursor)
        .render(doc)
        .cursor
}

fn buffer_row(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(40, 8)).unwrap()
}

fn model_for(content: &str) -> Model {
    Model::new(Editor::from_html(content), None, NoteFormat::Html, (40, 8))
}

#[test]
fn test_blocks_are_separated_by_blank_rows() {
    let doc = html::parse("<h2>Title</h2><p>Body</p><hr><p>End</p>");
    let rule = "─".repeat(10);
    assert_eq!(
        rows(&doc, 10),
        vec!["## Title", "", "Body", "", rule.as_str(), "", "End"]
    );
}

#[test]
fn test_list_items_render_tight_with_markers() {
    let doc = html::parse("<ol><li><p>a</p></li><li><p>b</p><ul><li><p>c</p></li></ul></li></ol>");
    assert_eq!(rows(&doc, 0), vec!["1. a", "2. b", "  • c"]);
}

#[test]
fn test_quote_and_code_prefixes() {
    let doc = html::parse("<blockquote><p>said</p></blockquote><pre><code>a\nb</code></pre>");
    assert_eq!(rows(&doc, 0), vec!["│ said", "", "  a", "  b"]);
}

#[test]
fn test_typing_anchor_is_hidden() {
    let mut editor = Editor::new();
    for c in "**x**".chars() {
        editor.apply(Intent::InsertText(c.to_string()));
    }
    assert_eq!(rows(editor.document(), 0), vec!["x"]);
    assert_eq!(caret(editor.document(), editor.cursor(), 0), Some((0, 1)));
}

#[test]
fn test_long_paragraph_wraps_and_caret_follows() {
    let doc = html::parse("<p>aaaaaaaaaaaa</p>");
    let block = doc.first().unwrap().id();
    assert_eq!(rows(&doc, 10), vec!["aaaaaaaaaa", "aa"]);
    assert_eq!(caret(&doc, Cursor::new(block, 12), 10), Some((1, 2)));
    assert_eq!(caret(&doc, Cursor::new(block, 10), 10), Some((1, 0)));
}

#[test]
fn test_wrapped_list_item_hangs_under_text() {
    let doc = html::parse("<ul><li><p>abcdef</p></li></ul>");
    assert_eq!(rows(&doc, 6), vec!["• abcd", "  ef"]);
}

#[test]
fn test_caret_in_heading_skips_prefix() {
    let doc = html::parse("<h1>Title</h1><p></p>");
    let heading = doc.first().unwrap().id();
    let empty = doc.last().unwrap().id();
    assert_eq!(caret(&doc, Cursor::at_start(heading), 0), Some((0, 2)));
    assert_eq!(caret(&doc, Cursor::at_start(empty), 0), Some((2, 0)));
}

#[test]
fn test_caret_after_code_newline_lands_on_next_row() {
    let mut editor = Editor::from_html("<pre><code>x = 1</code></pre>");
    editor.apply(Intent::End);
    editor.apply(Intent::Enter);
    assert_eq!(editor.cursor().offset, 6);
    assert_eq!(caret(editor.document(), editor.cursor(), 0), Some((1, 2)));
}

#[test]
fn test_render_draws_note_and_status() {
    let mut model = model_for("<h1>Plan</h1><p>Body</p>");
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    let buffer = terminal.backend().buffer();
    assert_eq!(buffer_row(buffer, 0), "  # Plan");
    assert_eq!(buffer_row(buffer, 2), "  Body");
    let status = buffer_row(buffer, 7);
    assert!(status.contains("untitled"), "status was {status:?}");
    assert!(status.contains("heading 1"), "status was {status:?}");
}

#[test]
fn test_render_places_terminal_cursor() {
    let mut model = model_for("<p>ab</p>");
    model.editor.apply(Intent::End);
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();
    let position = terminal.get_cursor_position().unwrap();
    assert_eq!((position.x, position.y), (DOCUMENT_LEFT_PADDING + 2, 0));
}

#[test]
fn test_render_scrolls_to_caret() {
    let paragraphs: String = (0..10).map(|i| format!("<p>line {i}</p>")).collect();
    let mut model = model_for(&paragraphs);
    for _ in 0..9 {
        model.editor.apply(Intent::Move(crate::cursor::Direction::Down));
    }
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(&mut model, frame)).unwrap();

    assert!(model.viewport.offset() > 0);
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer_row(buffer, 6), "  line 9");
}

#[test]
fn test_status_shows_lock_and_dirty_state() {
    let mut model = model_for("<p></p>");
    assert!(!status_text(&model).contains("[modified]"));
    model.editor.apply(Intent::InsertText("x".into()));
    model.editor.set_locked(true);
    let text = status_text(&model);
    assert!(text.contains("[modified]"));
    assert!(text.contains("[locked]"));
    assert!(text.contains("paragraph"));
}

#[test]
fn test_suggestions_listed_while_typing_query() {
    let mut model = model_for("<p></p>");
    model.mentions.register(NoteTarget::new("groceries.md", "Groceries"));
    model.mentions.register(NoteTarget::new("work.md", "Work"));
    assert_eq!(suggestion_text(&model), None);
    model.editor.apply(Intent::InsertText("@gro".into()));
    assert_eq!(suggestion_text(&model).as_deref(), Some(" @ M-1 Groceries"));
}

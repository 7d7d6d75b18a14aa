use std::path::Path;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tempfile::tempdir;

use crate::cursor::Direction;
use crate::editor::{Editor, Intent};
use crate::mention::NoteTarget;

use super::{App, Message, Model, NoteFormat, ToastLevel, update};

fn create_test_model(content: &str) -> Model {
    Model::new(Editor::from_html(content), None, NoteFormat::Html, (80, 24))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn type_text(mut model: Model, text: &str) -> Model {
    for c in text.chars() {
        let msg = App::handle_key(key(KeyCode::Char(c)), &model).unwrap();
        model = update(model, msg);
    }
    model
}

#[test]
fn test_keys_map_to_intents() {
    let model = create_test_model("<p></p>");
    let cases = [
        (KeyCode::Enter, Intent::Enter),
        (KeyCode::Backspace, Intent::Backspace),
        (KeyCode::Delete, Intent::DeleteForward),
        (KeyCode::Tab, Intent::Tab),
        (KeyCode::BackTab, Intent::ShiftTab),
        (KeyCode::Left, Intent::Move(Direction::Left)),
        (KeyCode::Down, Intent::Move(Direction::Down)),
        (KeyCode::Home, Intent::Home),
        (KeyCode::End, Intent::End),
        (KeyCode::Char('x'), Intent::InsertText("x".into())),
    ];
    for (code, intent) in cases {
        assert_eq!(App::handle_key(key(code), &model), Some(Message::Edit(intent)));
    }
}

#[test]
fn test_control_keys_map_to_commands() {
    let model = create_test_model("<p></p>");
    assert_eq!(App::handle_key(ctrl('s'), &model), Some(Message::Save));
    assert_eq!(App::handle_key(ctrl('l'), &model), Some(Message::ToggleLock));
    assert_eq!(App::handle_key(ctrl('q'), &model), Some(Message::Quit));
    assert_eq!(App::handle_key(ctrl('x'), &model), None);
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::Quit));
}

#[test]
fn test_key_release_is_ignored() {
    let model = create_test_model("<p></p>");
    let release = KeyEvent {
        code: KeyCode::Char('a'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert_eq!(App::handle_event(&Event::Key(release), &model), None);
}

#[test]
fn test_paste_inserts_text() {
    let model = create_test_model("<p></p>");
    let msg = App::handle_event(&Event::Paste("a\r\nb".into()), &model).unwrap();
    let model = update(model, msg);
    assert_eq!(model.editor.document().first().unwrap().text(), "a\nb");
}

#[test]
fn test_typing_converts_heading_through_the_host() {
    let model = type_text(create_test_model("<p></p>"), "## Notes");
    let msg = App::handle_key(key(KeyCode::Enter), &model).unwrap();
    let model = update(model, msg);
    assert_eq!(model.editor.html(), "<h2>Notes</h2><p></p>");
    assert!(model.editor.is_dirty());
}

#[test]
fn test_locked_note_rejects_typing_with_warning() {
    let model = update(create_test_model("<p>keep</p>"), Message::ToggleLock);
    assert!(model.editor.is_locked());
    let model = type_text(model, "x");
    assert_eq!(model.editor.html(), "<p>keep</p>");
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));

    let model = update(model, Message::Edit(Intent::End));
    assert_eq!(model.editor.cursor().offset, 4);
}

#[test]
fn test_quit_clean_note_exits_immediately() {
    let model = update(create_test_model("<p>a</p>"), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_dirty_note_needs_second_press() {
    let model = type_text(create_test_model("<p></p>"), "x");
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_armed);
    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_other_message_disarms_quit() {
    let model = type_text(create_test_model("<p></p>"), "x");
    let model = update(model, Message::Quit);
    let model = update(model, Message::Edit(Intent::Home));
    assert!(!model.quit_armed);
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

#[test]
fn test_accept_mention_replaces_query() {
    let mut model = create_test_model("<p></p>");
    model.mentions.register(NoteTarget::new("groceries.md", "Groceries"));
    let model = type_text(model, "buy @gro");

    let alt_one = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT);
    let msg = App::handle_key(alt_one, &model).unwrap();
    assert_eq!(msg, Message::AcceptMention(0));
    let model = update(model, msg);
    assert_eq!(
        model.editor.html(),
        "<p>buy <span data-type=\"mention\" data-id=\"groceries.md\" data-label=\"Groceries\">@Groceries</span></p>"
    );
}

#[test]
fn test_alt_digit_without_suggestions_is_ignored() {
    let model = create_test_model("<p></p>");
    let alt_one = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::ALT);
    assert_eq!(App::handle_key(alt_one, &model), None);
}

#[test]
fn test_resize_updates_viewport_height() {
    let model = update(create_test_model("<p></p>"), Message::Resize(100, 40));
    assert_eq!(model.viewport.height(), 39);
}

#[test]
fn test_note_format_detection() {
    assert_eq!(NoteFormat::detect(Some(Path::new("a.md")), false), NoteFormat::Markdown);
    assert_eq!(NoteFormat::detect(Some(Path::new("a.html")), false), NoteFormat::Html);
    assert_eq!(NoteFormat::detect(Some(Path::new("a.html")), true), NoteFormat::Markdown);
    assert_eq!(NoteFormat::detect(None, false), NoteFormat::Html);
}

#[test]
fn test_open_markdown_note_and_save_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("list.md");
    std::fs::write(&path, "# Plan\n\n- milk\n").unwrap();

    let mut model = Model::open(&path, NoteFormat::Markdown, (80, 24)).unwrap();
    assert_eq!(model.editor.html(), "<h1>Plan</h1><ul><li><p>milk</p></li></ul>");

    model.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Plan\n\n- milk\n");
}

#[test]
fn test_open_missing_file_starts_empty_note() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.html");
    let model = Model::open(&path, NoteFormat::Html, (80, 24)).unwrap();
    assert_eq!(model.editor.html(), "<p></p>");
    assert_eq!(model.display_name(), "new.html");
}

#[test]
fn test_sibling_notes_become_mention_targets() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("groceries.md"), "").unwrap();
    std::fs::write(dir.path().join("work.html"), "").unwrap();
    std::fs::write(dir.path().join("image.png"), "").unwrap();
    let path = dir.path().join("today.html");
    std::fs::write(&path, "<p></p>").unwrap();

    let mut model = Model::open(&path, NoteFormat::Html, (80, 24)).unwrap();
    model.load_sibling_mentions();

    assert_eq!(model.mentions.len(), 2);
    assert_eq!(
        model.mentions.get("groceries.md").map(|t| t.title.as_str()),
        Some("groceries")
    );
    assert!(model.mentions.get("today.html").is_none());
}

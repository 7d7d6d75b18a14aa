use std::cell::RefCell;
use std::rc::Rc;

use livemark::prelude::*;

fn type_text(editor: &mut Editor, text: &str) {
    for c in text.chars() {
        editor.apply(Intent::InsertText(c.to_string()));
    }
}

fn kinds(editor: &Editor) -> Vec<BlockKind> {
    editor.document().blocks().iter().map(Block::kind).collect()
}

fn texts(editor: &Editor) -> Vec<String> {
    editor.document().blocks().iter().map(Block::text).collect()
}

#[test]
fn test_converted_blocks_survive_a_round_trip() {
    let cases = [
        ("## Notes", BlockKind::Heading(2), "Notes"),
        ("> quoted", BlockKind::Blockquote, "quoted"),
        ("- milk", BlockKind::ListItem(ListKind::Bullet), "milk"),
        ("3. eggs", BlockKind::ListItem(ListKind::Ordered), "eggs"),
    ];
    for (typed, kind, text) in cases {
        let mut editor = Editor::new();
        type_text(&mut editor, typed);
        editor.apply(Intent::Enter);

        let first = editor.document().first().unwrap();
        assert_eq!((first.kind(), first.text().as_str()), (kind, text), "typed {typed:?}");

        let reloaded = Editor::from_html(&editor.html());
        let first = reloaded.document().first().unwrap();
        assert_eq!((first.kind(), first.text().as_str()), (kind, text), "reloaded {typed:?}");
        assert_eq!(reloaded.html(), editor.html());
    }
}

#[test]
fn test_marker_without_space_stays_literal() {
    let mut editor = Editor::new();
    type_text(&mut editor, "#Title");
    editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![BlockKind::Paragraph, BlockKind::Paragraph]);
    assert_eq!(texts(&editor), vec!["#Title", ""]);
}

#[test]
fn test_bold_is_greedy_minimal() {
    let mut editor = Editor::new();
    type_text(&mut editor, "**a** and **b**");
    let bold: Vec<&str> = editor
        .document()
        .first()
        .unwrap()
        .inlines()
        .iter()
        .filter(|inline| inline.kind == InlineKind::Bold)
        .map(|inline| inline.text.as_str())
        .collect();
    assert_eq!(bold, vec!["a", "b"]);
    assert_eq!(editor.html(), "<p><strong>a</strong> and <strong>b</strong></p>");
}

#[test]
fn test_list_continues_then_exits() {
    let mut editor = Editor::from_html("<ul><li><p>milk</p></li></ul>");
    editor.apply(Intent::End);
    editor.apply(Intent::Enter);
    let bullet = BlockKind::ListItem(ListKind::Bullet);
    assert_eq!(kinds(&editor), vec![bullet, bullet]);
    assert_eq!(texts(&editor), vec!["milk", ""]);
    assert_eq!(editor.document().block_at(1).unwrap().indent(), 0);

    editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![bullet, BlockKind::Paragraph]);
    assert_eq!(editor.html(), "<ul><li><p>milk</p></li></ul><p></p>");
}

#[test]
fn test_empty_item_in_middle_of_list_exits_after_the_list() {
    let mut editor = Editor::from_html("<ul><li><p>a</p></li><li><p></p></li><li><p>b</p></li></ul>");
    editor.apply(Intent::Move(Direction::Down));
    let outcome = editor.apply(Intent::Enter);
    let bullet = BlockKind::ListItem(ListKind::Bullet);
    assert_eq!(kinds(&editor), vec![bullet, bullet, BlockKind::Paragraph]);
    assert_eq!(texts(&editor), vec!["a", "b", ""]);
    let paragraph = editor.document().block_at(2).unwrap().id();
    assert_eq!(outcome.cursor, Cursor::at_start(paragraph));
    assert_eq!(editor.html(), "<ul><li><p>a</p></li><li><p>b</p></li></ul><p></p>");
}

#[test]
fn test_enter_inside_list_item_text_adds_empty_item() {
    let mut editor = Editor::from_html("<ul><li><p>milk</p></li></ul>");
    editor.apply(Intent::Move(Direction::Right));
    editor.apply(Intent::Move(Direction::Right));
    editor.apply(Intent::Enter);
    assert_eq!(texts(&editor), vec!["milk", ""]);
    assert_eq!(editor.cursor().offset, 0);
}

#[test]
fn test_fence_then_two_enters_leaves_empty_code_block() {
    let mut editor = Editor::new();
    type_text(&mut editor, "```");
    editor.apply(Intent::Enter);
    editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![BlockKind::CodeBlock, BlockKind::Paragraph]);
    assert_eq!(editor.html(), "<pre><code></code></pre><p></p>");
}

#[test]
fn test_repeated_spaces_survive_reload() {
    let mut editor = Editor::new();
    type_text(&mut editor, "## a  b");
    editor.apply(Intent::Enter);
    let reloaded = Editor::from_html(&editor.html());
    let first = reloaded.document().first().unwrap();
    assert_eq!((first.kind(), first.text()), (BlockKind::Heading(2), "a  b".to_string()));
}

#[test]
fn test_heading_demotion_preserves_text() {
    let mut editor = Editor::from_html("<h2>Notes</h2>");
    let outcome = editor.apply(Intent::Backspace);
    assert!(outcome.changed);
    assert_eq!(kinds(&editor), vec![BlockKind::Paragraph]);
    assert_eq!(texts(&editor), vec!["Notes"]);
    assert_eq!(outcome.cursor.offset, 0);
}

#[test]
fn test_code_fence_exit_lands_after_code_block() {
    let mut editor = Editor::new();
    type_text(&mut editor, "```");
    editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![BlockKind::CodeBlock]);

    type_text(&mut editor, "x = 1");
    editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![BlockKind::CodeBlock]);
    assert_eq!(texts(&editor), vec!["x = 1\n"]);

    let outcome = editor.apply(Intent::Enter);
    assert_eq!(kinds(&editor), vec![BlockKind::CodeBlock, BlockKind::Paragraph]);
    assert_eq!(texts(&editor), vec!["x = 1", ""]);
    let paragraph = editor.document().block_at(1).unwrap().id();
    assert_eq!(outcome.cursor, Cursor::at_start(paragraph));
    assert_eq!(editor.html(), "<pre><code>x = 1</code></pre><p></p>");
}

#[test]
fn test_backspace_merges_paragraphs_at_boundary() {
    let mut editor = Editor::from_html("<p>one</p><p>two</p>");
    editor.apply(Intent::Move(Direction::Down));
    editor.apply(Intent::Home);
    let outcome = editor.apply(Intent::Backspace);
    assert_eq!(texts(&editor), vec!["onetwo"]);
    assert_eq!(outcome.cursor.offset, 3);
}

#[test]
fn test_backspace_on_first_block_is_noop() {
    let mut editor = Editor::from_html("<p>one</p>");
    let outcome = editor.apply(Intent::Backspace);
    assert!(!outcome.changed);
    assert_eq!(editor.html(), "<p>one</p>");
}

#[test]
fn test_tab_and_shift_tab_only_touch_indent() {
    let mut editor = Editor::from_html("<ul><li><p>a</p></li><li><p>b</p></li></ul>");
    editor.apply(Intent::Move(Direction::Down));
    let before = editor.cursor();
    editor.apply(Intent::Tab);
    assert_eq!(editor.cursor(), before);
    assert_eq!(editor.html(), "<ul><li><p>a</p><ul><li><p>b</p></li></ul></li></ul>");

    editor.apply(Intent::ShiftTab);
    let outcome = editor.apply(Intent::ShiftTab);
    assert!(!outcome.changed);
    assert_eq!(editor.document().block_at(1).unwrap().indent(), 0);
}

#[test]
fn test_on_change_sees_every_edit_and_lock_blocks_edits() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut editor = Editor::new().with_on_change(move |html| sink.borrow_mut().push(html.to_string()));

    type_text(&mut editor, "*hi*");
    assert_eq!(seen.borrow().last().map(String::as_str), Some("<p><em>hi</em></p>"));
    let count = seen.borrow().len();

    editor.set_locked(true);
    type_text(&mut editor, "more");
    editor.apply(Intent::Enter);
    editor.apply(Intent::Move(Direction::Left));
    assert_eq!(seen.borrow().len(), count);
    assert_eq!(editor.html(), "<p><em>hi</em></p>");
}

#[test]
fn test_typing_after_conversion_is_plain() {
    let mut editor = Editor::new();
    type_text(&mut editor, "`code` then");
    assert_eq!(editor.html(), "<p><code>code</code> then</p>");
    let plain_tail = editor.document().first().unwrap().inlines().last().unwrap();
    assert_eq!(plain_tail.kind, InlineKind::Plain);
}

#[test]
fn test_mention_round_trips_unchanged() {
    let mut registry = MentionRegistry::new();
    registry.register(NoteTarget::new("42", "Groceries"));
    let mut editor = Editor::new();
    type_text(&mut editor, "see @groc");
    let target = registry.suggest(editor.mention_query().unwrap())[0].clone();
    editor.apply(target.intent());

    let html = editor.html();
    assert_eq!(
        html,
        "<p>see <span data-type=\"mention\" data-id=\"42\" data-label=\"Groceries\">@Groceries</span></p>"
    );
    assert_eq!(Editor::from_html(&html).document().mentions(), vec!["42"]);
    assert_eq!(editor.markdown(), "see [@Groceries](note:42)\n");
}

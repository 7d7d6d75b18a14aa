//! Benchmarks for per-keystroke editing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use livemark::editor::{Editor, Intent};

fn type_text(editor: &mut Editor, text: &str) {
    for c in text.chars() {
        editor.apply(Intent::InsertText(c.to_string()));
    }
}

fn bench_type_plain_line(c: &mut Criterion) {
    c.bench_function("type_plain_line", |b| {
        b.iter(|| {
            let mut editor = Editor::new();
            type_text(&mut editor, black_box("the quick brown fox jumps over the lazy dog"));
            editor
        })
    });
}

fn bench_type_styled_line(c: &mut Criterion) {
    c.bench_function("type_styled_line", |b| {
        b.iter(|| {
            let mut editor = Editor::new();
            type_text(&mut editor, black_box("**bold** then *italic* and `code` ~~gone~~"));
            editor
        })
    });
}

fn bench_type_in_long_note(c: &mut Criterion) {
    let html = "<p>filler paragraph with some words</p>".repeat(500);
    c.bench_function("type_in_long_note", |b| {
        b.iter_batched(
            || Editor::from_html(&html),
            |mut editor| {
                editor.apply(Intent::End);
                type_text(&mut editor, black_box(" and more"));
                editor.apply(Intent::Enter);
                editor
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_type_plain_line, bench_type_styled_line, bench_type_in_long_note);
criterion_main!(benches);

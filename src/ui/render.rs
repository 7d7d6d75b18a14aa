use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::cursor::Cursor;
use crate::document::{Block, BlockKind, Document, ListKind, TYPING_ANCHOR};
use crate::render::DocumentRenderer;
use crate::ui::DOCUMENT_LEFT_PADDING;
use crate::ui::style::Theme;

/// Width used for rules when rendering without a width limit.
const UNBOUNDED_RULE_WIDTH: usize = 40;

/// A document laid out as terminal rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDocument {
    pub lines: Vec<Line<'static>>,
    /// Caret position as (row, column), when a cursor was given.
    pub cursor: Option<(usize, u16)>,
}

/// Lays a document out as styled terminal rows, wrapping at `width`.
///
/// Typing anchors are hidden. Markers that were consumed by conversion are
/// shown as a dim prefix (heading hashes, list bullets, the quote bar) since
/// a terminal has no font sizes to tell a heading apart.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    theme: Theme,
    width: u16,
    cursor: Option<Cursor>,
}

impl TerminalRenderer {
    /// `width` of 0 disables wrapping.
    pub const fn new(theme: Theme, width: u16) -> Self {
        Self {
            theme,
            width,
            cursor: None,
        }
    }

    #[must_use]
    pub const fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    fn write_block(&self, out: &mut LineWriter, doc: &Document, index: usize, block: &Block) {
        let caret = self.cursor.filter(|c| c.block == block.id()).map(|c| c.offset);
        let kind = block.kind();
        if kind == BlockKind::ThematicBreak {
            if caret.is_some() {
                out.mark_cursor();
            }
            let width = if out.width == 0 {
                UNBOUNDED_RULE_WIDTH
            } else {
                out.width
            };
            out.push_prefix("─".repeat(width), self.theme.block(kind));
            out.end_line();
            return;
        }

        let indent = "  ".repeat(block.indent());
        let (first, hang) = match kind {
            BlockKind::Heading(level) => {
                let hashes = "#".repeat(usize::from(level));
                let hang = " ".repeat(hashes.len() + 1);
                (format!("{hashes} "), hang)
            }
            BlockKind::Blockquote => ("│ ".to_string(), "│ ".to_string()),
            BlockKind::ListItem(ListKind::Bullet) => {
                (format!("{indent}• "), format!("{indent}  "))
            }
            BlockKind::ListItem(ListKind::Ordered) => {
                let marker = format!("{}. ", doc.list_ordinal(index));
                let hang = format!("{indent}{}", " ".repeat(marker.len()));
                (format!("{indent}{marker}"), hang)
            }
            BlockKind::CodeBlock => ("  ".to_string(), "  ".to_string()),
            BlockKind::Paragraph | BlockKind::ThematicBreak => (String::new(), String::new()),
        };
        let marker = self.theme.marker();
        let base = self.theme.block(kind);
        out.start_block(first, hang, marker);

        let mut offset = 0;
        for inline in block.inlines() {
            let style = self.theme.inline(base, &inline.kind);
            for (i, c) in inline.text.char_indices() {
                let at_caret = caret == Some(offset + i);
                match c {
                    TYPING_ANCHOR => {
                        if at_caret {
                            out.mark_cursor();
                        }
                    }
                    '\n' => {
                        if at_caret {
                            out.mark_cursor();
                        }
                        out.continue_block();
                    }
                    _ => out.push_char(c, style, at_caret),
                }
            }
            offset += inline.len();
        }
        if caret == Some(offset) {
            out.mark_cursor();
        }
        out.end_line();
    }
}

impl DocumentRenderer for TerminalRenderer {
    type Output = RenderedDocument;

    fn render(&self, doc: &Document) -> RenderedDocument {
        let mut out = LineWriter::new(usize::from(self.width));
        let mut previous: Option<BlockKind> = None;
        for (index, block) in doc.blocks().iter().enumerate() {
            let kind = block.kind();
            let tight = previous.is_some_and(BlockKind::is_list_item) && kind.is_list_item();
            if previous.is_some() && !tight {
                out.end_line();
            }
            self.write_block(&mut out, doc, index, block);
            previous = Some(kind);
        }
        RenderedDocument {
            lines: out.lines,
            cursor: out.cursor,
        }
    }
}

/// Accumulates styled rows, wrapping by display width.
struct LineWriter {
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    col: usize,
    hang: String,
    hang_style: Style,
    cursor: Option<(usize, u16)>,
}

impl LineWriter {
    const fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            spans: Vec::new(),
            col: 0,
            hang: String::new(),
            hang_style: Style::new(),
            cursor: None,
        }
    }

    fn start_block(&mut self, first: String, hang: String, style: Style) {
        self.hang = hang;
        self.hang_style = style;
        self.push_prefix(first, style);
    }

    fn push_prefix(&mut self, text: String, style: Style) {
        if text.is_empty() {
            return;
        }
        self.col += display_width(&text);
        self.spans.push(Span::styled(text, style));
    }

    fn push_char(&mut self, c: char, style: Style, at_caret: bool) {
        let w = c.width().unwrap_or(0);
        let hang_width = display_width(&self.hang);
        if self.width > 0 && self.col + w > self.width && self.col > hang_width {
            self.continue_block();
        }
        if at_caret {
            self.mark_cursor();
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(c),
            _ => self.spans.push(Span::styled(c.to_string(), style)),
        }
        self.col += w;
    }

    /// Break the row and indent the next one under the block's text.
    fn continue_block(&mut self) {
        self.end_line();
        let hang = self.hang.clone();
        self.push_prefix(hang, self.hang_style);
    }

    fn mark_cursor(&mut self) {
        if self.cursor.is_none() {
            let col = u16::try_from(self.col).unwrap_or(u16::MAX);
            self.cursor = Some((self.lines.len(), col));
        }
    }

    fn end_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
        self.col = 0;
    }
}

fn display_width(text: &str) -> usize {
    text.chars().filter_map(UnicodeWidthChar::width).sum()
}

/// Draw the editor: the note, the caret and the status bar.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let [doc_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
    let content = Rect {
        x: doc_area.x + DOCUMENT_LEFT_PADDING.min(doc_area.width),
        width: doc_area.width.saturating_sub(DOCUMENT_LEFT_PADDING),
        ..doc_area
    };

    let rendered = TerminalRenderer::new(model.theme, content.width)
        .with_cursor(model.editor.cursor())
        .render(model.editor.document());

    model.viewport.resize(content.height);
    model.viewport.set_total_lines(rendered.lines.len());
    if let Some((row, _)) = rendered.cursor {
        model.viewport.follow(row);
    }
    let range = model.viewport.visible_range();
    let visible = rendered.lines.get(range.clone()).unwrap_or_default().to_vec();
    frame.render_widget(Paragraph::new(visible), content);

    if let Some((row, col)) = rendered.cursor.filter(|(row, _)| range.contains(row)) {
        let y = u16::try_from(row - range.start).unwrap_or(0);
        let x = col.min(content.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(content.x + x, content.y + y));
    }

    super::status::render_status_bar(model, frame, status_area);
}

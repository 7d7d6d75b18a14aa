//! Markdown import (via comrak) and export.
//!
//! Mentions travel as links with a `note:` url, e.g. `[@Groceries](note:42)`.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use tracing::debug;

use super::{Block, BlockKind, Document, Inline, InlineKind, ListKind, TYPING_ANCHOR};

const NOTE_SCHEME: &str = "note:";

fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options
}

/// Build a document from Markdown source.
pub fn from_markdown(source: &str) -> Document {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);
    let mut doc = Document::empty();
    for child in root.children() {
        import_block(child, &mut doc, Context::Top);
    }
    doc.ensure_structure();
    doc
}

#[derive(Debug, Clone, Copy)]
enum Context {
    Top,
    Quote,
    List { kind: ListKind, depth: usize },
}

impl Context {
    const fn text_kind(self) -> BlockKind {
        match self {
            Self::Top => BlockKind::Paragraph,
            Self::Quote => BlockKind::Blockquote,
            Self::List { kind, .. } => BlockKind::ListItem(kind),
        }
    }

    const fn indent(self) -> usize {
        match self {
            Self::List { depth, .. } => depth,
            _ => 0,
        }
    }
}

fn import_block<'a>(node: &'a AstNode<'a>, doc: &mut Document, context: Context) {
    match &node.data.borrow().value {
        NodeValue::Paragraph => {
            doc.push_block(context.text_kind(), context.indent(), collect_inlines(node));
        }
        NodeValue::Heading(heading) => {
            let kind = match context {
                Context::Top => BlockKind::Heading(heading.level.clamp(1, 6)),
                _ => context.text_kind(),
            };
            doc.push_block(kind, context.indent(), collect_inlines(node));
        }
        NodeValue::BlockQuote => {
            let inner = match context {
                Context::List { .. } => context,
                _ => Context::Quote,
            };
            for child in node.children() {
                import_block(child, doc, inner);
            }
        }
        NodeValue::List(list) => {
            let kind = match list.list_type {
                ListType::Bullet => ListKind::Bullet,
                ListType::Ordered => ListKind::Ordered,
            };
            let depth = match context {
                Context::List { depth, .. } => depth + 1,
                _ => 0,
            };
            for child in node.children() {
                import_block(child, doc, Context::List { kind, depth });
            }
        }
        NodeValue::Item(_) => {
            let before = doc.len();
            for child in node.children() {
                import_block(child, doc, context);
            }
            // An item with no paragraph (`- ` alone) is still an item.
            if doc.len() == before {
                doc.push_block(context.text_kind(), context.indent(), Vec::new());
            }
        }
        NodeValue::CodeBlock(code_block) => {
            let literal = code_block.literal.trim_end_matches('\n');
            doc.push_block(BlockKind::CodeBlock, 0, vec![Inline::plain(literal)]);
        }
        NodeValue::ThematicBreak => {
            doc.push_block(BlockKind::ThematicBreak, 0, Vec::new());
        }
        NodeValue::HtmlBlock(html) => {
            let text = html.literal.trim();
            if !text.is_empty() {
                doc.push_block(context.text_kind(), context.indent(), vec![Inline::plain(text)]);
            }
        }
        other => {
            debug!(node = ?other, "unsupported markdown block; importing its children");
            for child in node.children() {
                import_block(child, doc, context);
            }
        }
    }
}

fn collect_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for child in node.children() {
        collect_inlines_recursive(child, &InlineKind::Plain, &mut inlines);
    }
    inlines
}

fn collect_inlines_recursive<'a>(node: &'a AstNode<'a>, kind: &InlineKind, out: &mut Vec<Inline>) {
    let styled = match &node.data.borrow().value {
        NodeValue::Text(text) => {
            out.push(Inline::new(kind.clone(), text.clone()));
            return;
        }
        NodeValue::Code(code) => {
            out.push(Inline::new(InlineKind::Code, code.literal.clone()));
            return;
        }
        NodeValue::SoftBreak => {
            out.push(Inline::new(kind.clone(), " "));
            return;
        }
        NodeValue::LineBreak => {
            out.push(Inline::new(kind.clone(), "\n"));
            return;
        }
        NodeValue::Link(link) => {
            if let Some(id) = link.url.strip_prefix(NOTE_SCHEME) {
                let label = extract_text(node);
                let label = if label.starts_with('@') {
                    label
                } else {
                    format!("@{label}")
                };
                out.push(Inline::mention(id, label));
                return;
            }
            kind.clone()
        }
        NodeValue::HtmlInline(_) => return,
        NodeValue::Emph => InlineKind::Italic,
        NodeValue::Strong => InlineKind::Bold,
        NodeValue::Strikethrough => InlineKind::Strikethrough,
        _ => kind.clone(),
    };
    for child in node.children() {
        collect_inlines_recursive(child, &styled, out);
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            _ => {}
        }
    }
    text
}

/// Render a document as Markdown.
///
/// Empty paragraphs have no Markdown form and are dropped.
pub fn to_markdown(doc: &Document) -> String {
    let mut out = String::new();
    let mut prev: Option<BlockKind> = None;
    let mut marker_widths: Vec<usize> = Vec::new();
    for (index, block) in doc.blocks().iter().enumerate() {
        let kind = block.kind();
        if kind == BlockKind::Paragraph && block.is_blank() {
            continue;
        }
        if let Some(prev) = prev {
            // A top-level switch between bullet and ordered starts a new list.
            let new_list = block.indent() == 0 && prev != kind;
            let tight = prev.is_list_item() && kind.is_list_item() && !new_list;
            out.push_str(if tight { "\n" } else { "\n\n" });
        }
        if !kind.is_list_item() {
            marker_widths.clear();
        }
        match kind {
            BlockKind::Paragraph => write_text(&mut out, block, ""),
            BlockKind::Heading(level) => {
                out.push_str(&"#".repeat(usize::from(level.clamp(1, 6))));
                out.push(' ');
                write_text(&mut out, block, "");
            }
            BlockKind::Blockquote => {
                out.push_str("> ");
                write_text(&mut out, block, "> ");
            }
            BlockKind::ListItem(list) => {
                let indent = block.indent();
                marker_widths.truncate(indent);
                while marker_widths.len() < indent {
                    marker_widths.push(2);
                }
                let lead = " ".repeat(marker_widths.iter().sum());
                let marker = match list {
                    ListKind::Bullet => "- ".to_string(),
                    ListKind::Ordered => format!("{}. ", doc.list_ordinal(index)),
                };
                marker_widths.push(marker.len());
                let continuation = " ".repeat(lead.len() + marker.len());
                out.push_str(&lead);
                out.push_str(&marker);
                write_text(&mut out, block, &continuation);
            }
            BlockKind::CodeBlock => {
                let code = block.text().replace(TYPING_ANCHOR, "");
                let fence = code_fence(&code, '`', 3);
                out.push_str(&fence);
                out.push('\n');
                if !code.is_empty() {
                    out.push_str(&code);
                    out.push('\n');
                }
                out.push_str(&fence);
            }
            BlockKind::ThematicBreak => out.push_str("---"),
        }
        prev = Some(kind);
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Write a block's runs; `continuation` prefixes lines after a hard break.
fn write_text(out: &mut String, block: &Block, continuation: &str) {
    let mut line_start = true;
    for inline in block.inlines() {
        let text = inline.text.replace(TYPING_ANCHOR, "");
        if text.is_empty() {
            continue;
        }
        let rendered = match &inline.kind {
            InlineKind::Plain => escape_text(&text, &mut line_start),
            InlineKind::Code => {
                let fence = code_fence(&text, '`', 1);
                let pad = if text.starts_with('`') || text.ends_with('`') {
                    " "
                } else {
                    ""
                };
                line_start = false;
                format!("{fence}{pad}{text}{pad}{fence}")
            }
            InlineKind::Mention { id } => {
                line_start = false;
                format!("[{}]({NOTE_SCHEME}{id})", escape_text(&text, &mut false))
            }
            InlineKind::Bold => wrap_styled(&text, "**", &mut line_start),
            InlineKind::Italic => wrap_styled(&text, "*", &mut line_start),
            InlineKind::Strikethrough => wrap_styled(&text, "~~", &mut line_start),
        };
        out.push_str(&rendered.replace('\n', &format!("\\\n{continuation}")));
    }
}

/// Wrap text in a delimiter, keeping surrounding whitespace outside it so
/// the span still parses as emphasis.
fn wrap_styled(text: &str, delimiter: &str, line_start: &mut bool) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return escape_text(text, line_start);
    }
    let start = text.len() - text.trim_start().len();
    let end = start + trimmed.len();
    let lead = escape_text(&text[..start], line_start);
    *line_start = false;
    let body = escape_text(trimmed, &mut false);
    let tail = escape_text(&text[end..], &mut false);
    format!("{lead}{delimiter}{body}{delimiter}{tail}")
}

/// Backslash-escape inline delimiters, plus block markers at line start.
fn escape_text(text: &str, line_start: &mut bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if *line_start {
            match c {
                '#' | '>' | '-' | '+' | '=' => out.push('\\'),
                '0'..='9' => {
                    out.push(c);
                    let mut digits = String::new();
                    while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        digits.push(d);
                        chars.next();
                    }
                    out.push_str(&digits);
                    if let Some(&next) = chars.peek().filter(|n| matches!(n, '.' | ')')) {
                        out.push('\\');
                        out.push(next);
                        chars.next();
                    }
                    *line_start = false;
                    continue;
                }
                _ => {}
            }
        }
        if matches!(c, '\\' | '*' | '_' | '~' | '`' | '[' | ']' | '<' | '&') {
            out.push('\\');
        }
        out.push(c);
        *line_start = c == '\n';
    }
    out
}

/// Shortest run of `fence` chars (at least `min`) that does not occur in `text`.
fn code_fence(text: &str, fence: char, min: usize) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == fence {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    fence.to_string().repeat(min.max(longest + 1))
}

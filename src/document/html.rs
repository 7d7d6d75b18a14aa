//! HTML content string: the format notes are loaded from and saved to.
//!
//! The markup matches what rich-text note editors commonly emit:
//! `<p>`, `<h1>`..`<h6>`, `<blockquote><p>`, nested `<ul>`/`<ol>` with
//! `<li><p>`, `<pre><code>`, `<hr>`, and the inline tags `<strong>`, `<em>`,
//! `<s>`, `<code>`, `<br>` and mention spans.
//!
//! Parsing is tolerant. Unknown tags are skipped and their text kept,
//! unterminated tags become literal text, and stray text lands in a
//! paragraph, so a damaged save still opens.

use std::fmt::Write as _;

use tracing::warn;

use super::{Block, BlockKind, Document, Inline, InlineKind, ListKind, TYPING_ANCHOR};

/// Serialize a document to its HTML content string.
///
/// Typing anchors are editing artifacts and are not written out.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    let mut lists = ListStack::default();
    for block in doc.blocks() {
        if let BlockKind::ListItem(kind) = block.kind() {
            lists.open_item(&mut out, kind, block.indent());
            out.push_str("<p>");
            write_inlines(&mut out, block);
            out.push_str("</p>");
            continue;
        }
        lists.close_all(&mut out);
        match block.kind() {
            BlockKind::Paragraph => {
                out.push_str("<p>");
                write_inlines(&mut out, block);
                out.push_str("</p>");
            }
            BlockKind::Heading(level) => {
                let level = level.clamp(1, 6);
                let _ = write!(out, "<h{level}>");
                write_inlines(&mut out, block);
                let _ = write!(out, "</h{level}>");
            }
            BlockKind::Blockquote => {
                out.push_str("<blockquote><p>");
                write_inlines(&mut out, block);
                out.push_str("</p></blockquote>");
            }
            BlockKind::CodeBlock => {
                out.push_str("<pre><code>");
                escape_into(&mut out, &strip_anchors(&block.text()));
                out.push_str("</code></pre>");
            }
            BlockKind::ThematicBreak => out.push_str("<hr>"),
            BlockKind::ListItem(_) => {}
        }
    }
    lists.close_all(&mut out);
    out
}

#[derive(Debug, Clone, Copy)]
struct ListFrame {
    kind: ListKind,
    level: usize,
    item_open: bool,
}

/// Open `<ul>`/`<ol>` elements while serializing a run of list items.
#[derive(Debug, Default)]
struct ListStack {
    frames: Vec<ListFrame>,
}

impl ListStack {
    fn open_item(&mut self, out: &mut String, kind: ListKind, level: usize) {
        while let Some(top) = self.frames.last().copied() {
            if top.level > level || (top.level == level && top.kind != kind) {
                self.close_top(out);
            } else {
                break;
            }
        }
        let top = self.frames.last().map(|frame| (frame.level, frame.item_open));
        match top {
            Some((top_level, item_open)) if top_level == level => {
                if item_open {
                    out.push_str("</li>");
                }
            }
            _ => {
                let first = top.map_or(0, |(top_level, _)| top_level + 1);
                for depth in first..=level {
                    out.push_str(list_open_tag(kind));
                    self.frames.push(ListFrame {
                        kind,
                        level: depth,
                        item_open: false,
                    });
                }
            }
        }
        out.push_str("<li>");
        if let Some(top) = self.frames.last_mut() {
            top.item_open = true;
        }
    }

    fn close_top(&mut self, out: &mut String) {
        if let Some(frame) = self.frames.pop() {
            if frame.item_open {
                out.push_str("</li>");
            }
            out.push_str(list_close_tag(frame.kind));
        }
    }

    fn close_all(&mut self, out: &mut String) {
        while !self.frames.is_empty() {
            self.close_top(out);
        }
    }
}

const fn list_open_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "<ul>",
        ListKind::Ordered => "<ol>",
    }
}

const fn list_close_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Bullet => "</ul>",
        ListKind::Ordered => "</ol>",
    }
}

fn write_inlines(out: &mut String, block: &Block) {
    let mut text_out = TextWriter::new(&strip_anchors(&block.text()));
    for inline in block.inlines() {
        let text = strip_anchors(&inline.text);
        let (open, close) = match &inline.kind {
            InlineKind::Plain => ("", ""),
            InlineKind::Bold => ("<strong>", "</strong>"),
            InlineKind::Italic => ("<em>", "</em>"),
            InlineKind::Strikethrough => ("<s>", "</s>"),
            InlineKind::Code => ("<code>", "</code>"),
            InlineKind::Mention { id } => {
                out.push_str("<span data-type=\"mention\" data-id=\"");
                escape_into(out, id);
                out.push_str("\" data-label=\"");
                escape_into(out, text.strip_prefix('@').unwrap_or(&text));
                out.push_str("\">");
                text_out.write(out, &text);
                out.push_str("</span>");
                continue;
            }
        };
        if text.is_empty() {
            continue;
        }
        out.push_str(open);
        text_out.write(out, &text);
        out.push_str(close);
    }
}

/// Writes a block's visible text across its runs.
///
/// Spaces the parser would collapse (at a line edge or after another space)
/// go out as `&nbsp;`, line breaks as `<br>`.
struct TextWriter {
    hard_spaces: Vec<bool>,
    pos: usize,
}

impl TextWriter {
    fn new(visible: &str) -> Self {
        let chars: Vec<char> = visible.chars().collect();
        let hard_spaces = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let after_edge = i == 0 || matches!(chars[i - 1], ' ' | '\n');
                let before_edge = chars.get(i + 1).is_none_or(|&next| next == '\n');
                c == ' ' && (after_edge || before_edge)
            })
            .collect();
        Self { hard_spaces, pos: 0 }
    }

    fn write(&mut self, out: &mut String, text: &str) {
        for c in text.chars() {
            let hard = self.hard_spaces.get(self.pos).copied().unwrap_or(false);
            self.pos += 1;
            match c {
                '\n' => out.push_str("<br>"),
                ' ' if hard => out.push_str("&nbsp;"),
                '\t' => out.push_str("&#9;"),
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                _ => out.push(c),
            }
        }
    }
}

fn strip_anchors(text: &str) -> String {
    text.replace(TYPING_ANCHOR, "")
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Parse an HTML content string into a document.
///
/// Never fails; see the module docs for how damaged markup degrades.
pub fn parse(source: &str) -> Document {
    let mut builder = Builder::default();
    for token in Tokenizer::new(source) {
        match token {
            Token::Open { name, attrs } => builder.open(&name, &attrs),
            Token::Close { name } => builder.close(&name),
            Token::Text(text) => builder.text(&text),
        }
    }
    builder.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close {
        name: String,
    },
    Text(String),
}

/// Minimal tag/text splitter. It does not build a tree; nesting is tracked
/// by the [`Builder`].
struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    const fn new(source: &'a str) -> Self {
        Self { rest: source }
    }

    fn take_text(&mut self) -> Token {
        let rest = self.rest;
        let end = rest[1..].find('<').map_or(rest.len(), |i| i + 1);
        let (text, rest) = rest.split_at(end);
        self.rest = rest;
        Token::Text(text.to_string())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let rest = self.rest;
            if rest.is_empty() {
                return None;
            }
            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                let (text, rest) = rest.split_at(end);
                self.rest = rest;
                return Some(Token::Text(text.to_string()));
            }
            if let Some(comment) = rest.strip_prefix("<!--") {
                self.rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
                continue;
            }
            let Some(end) = find_tag_end(rest) else {
                return Some(self.take_text());
            };
            let inner = &rest[1..end];
            self.rest = &rest[end + 1..];
            return Some(parse_tag(inner).unwrap_or_else(|| Token::Text(format!("<{inner}>"))));
        }
    }
}

/// Index of the `>` closing the tag at the start of `s`, honoring quotes.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '<') => return None,
            (None, '>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

fn parse_tag(inner: &str) -> Option<Token> {
    let inner = inner.trim().trim_end_matches('/').trim_end();
    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        return valid_tag_name(&name).then_some(Token::Close { name });
    }
    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    if !valid_tag_name(&name) {
        return None;
    }
    let attrs = parse_attrs(&inner[name_end..]);
    Some(Token::Open { name, attrs })
}

fn valid_tag_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return attrs;
        }
        let name_end = s
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(s.len());
        let name = s[..name_end].to_ascii_lowercase();
        s = s[name_end..].trim_start();
        let mut value = String::new();
        if let Some(rest) = s.strip_prefix('=') {
            let rest = rest.trim_start();
            if let Some(q) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let body = &rest[1..];
                let end = body.find(q).unwrap_or(body.len());
                value = decode_entities(&body[..end]);
                s = body.get(end + 1..).unwrap_or("");
            } else {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                value = decode_entities(&rest[..end]);
                s = &rest[end..];
            }
        }
        if !name.is_empty() {
            attrs.push((name, value));
        }
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            decode_entity(&rest[1..end]).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Streaming document builder driven by tokens.
#[derive(Debug)]
struct Builder {
    doc: Document,
    current: Option<PendingBlock>,
    lists: Vec<ListKind>,
    quote_depth: usize,
    in_pre: bool,
    styles: Vec<(String, Option<InlineKind>)>,
}

#[derive(Debug)]
struct PendingBlock {
    kind: BlockKind,
    indent: usize,
    inlines: Vec<Inline>,
    /// Opened by `<li>` and not yet given content, so a `<p>` may adopt it.
    fresh_item: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            doc: Document::empty(),
            current: None,
            lists: Vec::new(),
            quote_depth: 0,
            in_pre: false,
            styles: Vec::new(),
        }
    }
}

impl Builder {
    fn open(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "p" | "div" => {
                if self.current.as_ref().is_some_and(|block| block.fresh_item) {
                    if let Some(block) = self.current.as_mut() {
                        block.fresh_item = false;
                    }
                } else {
                    self.flush();
                    self.start(self.context_kind());
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                let level = name[1..].parse().unwrap_or(1);
                self.start(BlockKind::Heading(level));
            }
            "ul" | "ol" => {
                self.flush();
                self.lists.push(if name == "ol" {
                    ListKind::Ordered
                } else {
                    ListKind::Bullet
                });
            }
            "li" => {
                self.flush();
                let kind = self.lists.last().copied().unwrap_or(ListKind::Bullet);
                self.start(BlockKind::ListItem(kind));
                if let Some(block) = self.current.as_mut() {
                    block.fresh_item = true;
                }
            }
            "blockquote" => {
                self.flush();
                self.quote_depth += 1;
            }
            "pre" => {
                self.flush();
                self.start(BlockKind::CodeBlock);
                self.in_pre = true;
            }
            "hr" => {
                self.flush();
                self.start(BlockKind::ThematicBreak);
                self.flush();
            }
            "br" => self.push_text("\n"),
            "code" if self.in_pre => {}
            "strong" | "b" => self.styles.push((name.to_string(), Some(InlineKind::Bold))),
            "em" | "i" => self.styles.push((name.to_string(), Some(InlineKind::Italic))),
            "s" | "del" | "strike" => self
                .styles
                .push((name.to_string(), Some(InlineKind::Strikethrough))),
            "code" => self.styles.push((name.to_string(), Some(InlineKind::Code))),
            "span" => {
                let attr = |key: &str| {
                    attrs
                        .iter()
                        .find(|(name, _)| name == key)
                        .map(|(_, value)| value.as_str())
                };
                let kind = (attr("data-type") == Some("mention"))
                    .then(|| attr("data-id"))
                    .flatten()
                    .map(|id| InlineKind::Mention { id: id.to_string() });
                if let Some(InlineKind::Mention { .. }) = &kind {
                    let label = attr("data-label").unwrap_or_default();
                    self.styles.push((format!("span@{label}"), kind));
                } else {
                    self.styles.push((name.to_string(), None));
                }
            }
            "body" | "html" | "head" | "a" | "u" | "mark" | "sub" | "sup" => {}
            other => warn!(tag = other, "skipping unrecognized tag in note content"),
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" => self.flush(),
            "ul" | "ol" => {
                self.flush();
                self.lists.pop();
            }
            "blockquote" => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            "pre" => {
                self.flush();
                self.in_pre = false;
            }
            "code" if self.in_pre => {}
            "span" => {
                let Some(pos) = self
                    .styles
                    .iter()
                    .rposition(|(tag, _)| tag == "span" || tag.starts_with("span@"))
                else {
                    return;
                };
                let (tag, kind) = self.styles.remove(pos);
                self.styles.truncate(pos);
                if let (Some(label), Some(InlineKind::Mention { id })) =
                    (tag.strip_prefix("span@"), kind)
                {
                    self.finish_mention(id, label);
                }
            }
            _ => {
                if let Some(pos) = self.styles.iter().rposition(|(tag, _)| tag == name) {
                    self.styles.truncate(pos);
                }
            }
        }
    }

    /// Mentions whose element carried no text fall back to their label.
    fn finish_mention(&mut self, id: String, label: &str) {
        let has_text = self.current.as_ref().is_some_and(|block| {
            block
                .inlines
                .last()
                .is_some_and(|inline| inline.kind == (InlineKind::Mention { id: id.clone() }))
        });
        if !has_text && !label.is_empty() {
            let pending = self.ensure_block();
            pending
                .inlines
                .push(Inline::mention(id, format!("@{label}")));
        }
    }

    /// Raw text between tags. Whitespace collapses before entities are
    /// decoded, so `&nbsp;` and `&#9;` survive as written.
    fn text(&mut self, text: &str) {
        if self.in_pre {
            self.push_text(&decode_entities(text));
            return;
        }
        let waiting = self
            .current
            .as_ref()
            .is_none_or(|block| block.fresh_item);
        if waiting && text.trim().is_empty() {
            return;
        }
        let collapsed = decode_entities(&collapse_whitespace(text)).replace(NBSP, " ");
        self.push_text(&collapsed);
    }

    fn push_text(&mut self, text: &str) {
        let kind = self
            .styles
            .iter()
            .rev()
            .find_map(|(_, kind)| kind.clone())
            .unwrap_or(InlineKind::Plain);
        let in_pre = self.in_pre;
        let pending = self.ensure_block();
        pending.fresh_item = false;
        let kind = if in_pre { InlineKind::Plain } else { kind };
        // Each text token inside one mention span extends the same atom.
        if let (InlineKind::Mention { id }, Some(last)) = (&kind, pending.inlines.last_mut())
            && last.kind == (InlineKind::Mention { id: id.clone() })
        {
            last.text.push_str(text);
            return;
        }
        pending.inlines.push(Inline::new(kind, text));
    }

    fn ensure_block(&mut self) -> &mut PendingBlock {
        if self.current.is_none() {
            self.start(self.context_kind());
        }
        self.current.get_or_insert_with(|| PendingBlock {
            kind: BlockKind::Paragraph,
            indent: 0,
            inlines: Vec::new(),
            fresh_item: false,
        })
    }

    fn context_kind(&self) -> BlockKind {
        if !self.lists.is_empty() {
            BlockKind::ListItem(self.lists.last().copied().unwrap_or(ListKind::Bullet))
        } else if self.quote_depth > 0 {
            BlockKind::Blockquote
        } else {
            BlockKind::Paragraph
        }
    }

    fn start(&mut self, kind: BlockKind) {
        self.current = Some(PendingBlock {
            kind,
            indent: self.lists.len().saturating_sub(1),
            inlines: Vec::new(),
            fresh_item: false,
        });
    }

    fn flush(&mut self) {
        if let Some(mut block) = self.current.take() {
            if block.kind == BlockKind::CodeBlock {
                let text: String = block.inlines.iter().map(|i| i.text.as_str()).collect();
                block.inlines = vec![Inline::plain(text.trim_end_matches('\n'))];
            }
            self.doc.push_block(block.kind, block.indent, block.inlines);
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        self.doc.ensure_structure();
        self.doc
    }
}

const NBSP: char = '\u{a0}';

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

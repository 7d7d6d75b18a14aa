//! Projections of a document onto an output format.
//!
//! A renderer takes a shared borrow of the document and produces an owned
//! value, so consumers outside the editing loop work from a snapshot rather
//! than a live reference.

use crate::document::{Document, html, markdown};

/// Something a [`Document`] can be projected onto.
pub trait DocumentRenderer {
    type Output;

    fn render(&self, doc: &Document) -> Self::Output;
}

/// The HTML content string used for storage and `onChange`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, doc: &Document) -> String {
        html::serialize(doc)
    }
}

/// Markdown export.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    type Output = String;

    fn render(&self, doc: &Document) -> String {
        markdown::to_markdown(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_all<R: DocumentRenderer>(renderer: &R, docs: &[Document]) -> Vec<R::Output> {
        docs.iter().map(|doc| renderer.render(doc)).collect()
    }

    #[test]
    fn test_renderers_share_one_interface() {
        let doc = html::parse("<h1>Plan</h1><p><strong>go</strong></p>");
        assert_eq!(render_all(&HtmlRenderer, &[doc.clone()]), vec![html::serialize(&doc)]);
        assert_eq!(MarkdownRenderer.render(&doc), "# Plan\n\n**go**\n");
    }
}

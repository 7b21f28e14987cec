//! The render contract: the structural events a parse emits, in order.
//!
//! ```text
//! body
//! ( hr | heading | p | append | ol | ul
//! | table tr* end_table
//! | start_blockquote blockquote+ end_blockquote
//! | codeblock )*
//! done
//! ```

mod collect;
mod html;

pub use collect::BlockCollector;
pub use html::HtmlRenderer;

use crate::text::TextNode;

/// A backend for the parser. Every event is required; a backend without
/// a use for one implements it as a no-op.
pub trait Renderer {
    /// First event of every parse.
    fn body(&mut self);
    /// Last event of every parse.
    fn done(&mut self);
    fn hr(&mut self);
    /// Heading of `level` 1 through 6.
    fn heading(&mut self, level: u8, text: TextNode);
    fn p(&mut self, text: TextNode);
    /// Literal text, never markup.
    fn append(&mut self, text: &str);
    fn ol(&mut self, items: Vec<TextNode>);
    fn ul(&mut self, items: Vec<TextNode>);
    /// Opens a table with its header cells.
    fn table(&mut self, headings: Vec<TextNode>);
    fn tr(&mut self, cells: Vec<TextNode>);
    fn end_table(&mut self);
    fn start_blockquote(&mut self);
    /// One group of same-level quoted lines. Levels may rise and fall
    /// between calls inside one quote.
    fn blockquote(&mut self, text: TextNode, level: usize);
    fn end_blockquote(&mut self);
    fn codeblock(&mut self, text: &str, language: Option<&str>);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn body(&mut self) {
        (**self).body()
    }

    fn done(&mut self) {
        (**self).done()
    }

    fn hr(&mut self) {
        (**self).hr()
    }

    fn heading(&mut self, level: u8, text: TextNode) {
        (**self).heading(level, text)
    }

    fn p(&mut self, text: TextNode) {
        (**self).p(text)
    }

    fn append(&mut self, text: &str) {
        (**self).append(text)
    }

    fn ol(&mut self, items: Vec<TextNode>) {
        (**self).ol(items)
    }

    fn ul(&mut self, items: Vec<TextNode>) {
        (**self).ul(items)
    }

    fn table(&mut self, headings: Vec<TextNode>) {
        (**self).table(headings)
    }

    fn tr(&mut self, cells: Vec<TextNode>) {
        (**self).tr(cells)
    }

    fn end_table(&mut self) {
        (**self).end_table()
    }

    fn start_blockquote(&mut self) {
        (**self).start_blockquote()
    }

    fn blockquote(&mut self, text: TextNode, level: usize) {
        (**self).blockquote(text, level)
    }

    fn end_blockquote(&mut self) {
        (**self).end_blockquote()
    }

    fn codeblock(&mut self, text: &str, language: Option<&str>) {
        (**self).codeblock(text, language)
    }
}

use crate::text::TextNode;

/// A list (ordered or unordered) of single-paragraph items
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<TextNode>,
}

/// One run of same-level quoted lines
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub level: usize,
    pub content: TextNode,
}

/// Block-level elements, materialized from the parser's event stream
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        content: TextNode,
    },
    Paragraph {
        content: TextNode,
    },
    /// Literal text that must not be interpreted as markup
    Text(String),
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    List(List),
    Table {
        headers: Vec<TextNode>,
        rows: Vec<Vec<TextNode>>,
    },
    BlockQuote(Vec<Quote>),
    Rule,
}

use crate::block::{Block, List, Quote};
use crate::render::Renderer;
use crate::text::TextNode;

/// Builds a [`Block`] tree out of the event stream.
#[derive(Debug, Default)]
pub struct BlockCollector {
    blocks: Vec<Block>,
}

impl BlockCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl Renderer for BlockCollector {
    fn body(&mut self) {
        self.blocks.clear();
    }

    fn done(&mut self) {}

    fn hr(&mut self) {
        self.blocks.push(Block::Rule);
    }

    fn heading(&mut self, level: u8, content: TextNode) {
        self.blocks.push(Block::Heading { level, content });
    }

    fn p(&mut self, content: TextNode) {
        self.blocks.push(Block::Paragraph { content });
    }

    fn append(&mut self, text: &str) {
        self.blocks.push(Block::Text(text.to_string()));
    }

    fn ol(&mut self, items: Vec<TextNode>) {
        self.blocks.push(Block::List(List {
            ordered: true,
            items,
        }));
    }

    fn ul(&mut self, items: Vec<TextNode>) {
        self.blocks.push(Block::List(List {
            ordered: false,
            items,
        }));
    }

    fn table(&mut self, headers: Vec<TextNode>) {
        self.blocks.push(Block::Table {
            headers,
            rows: Vec::new(),
        });
    }

    fn tr(&mut self, cells: Vec<TextNode>) {
        if let Some(Block::Table { rows, .. }) = self.blocks.last_mut() {
            rows.push(cells);
        }
    }

    fn end_table(&mut self) {}

    fn start_blockquote(&mut self) {
        self.blocks.push(Block::BlockQuote(Vec::new()));
    }

    fn blockquote(&mut self, content: TextNode, level: usize) {
        if let Some(Block::BlockQuote(quotes)) = self.blocks.last_mut() {
            quotes.push(Quote { level, content });
        }
    }

    fn end_blockquote(&mut self) {}

    fn codeblock(&mut self, text: &str, language: Option<&str>) {
        self.blocks.push(Block::CodeBlock {
            language: language.map(str::to_string),
            content: text.to_string(),
        });
    }
}

//! A small markdown dialect: inline emphasis, strike, code, links and
//! images, plus headings, lists, tables, quotes, fenced code and rules.
//!
//! [`MarkdownParser`] scans a document and reports its structure to a
//! [`Renderer`]. The HTML backend renders those events directly; the
//! Typst/PDF backend first collects them into [`Block`]s.

mod block;
mod config;
mod cursor;
mod error;
mod inline;
mod line;
mod pairing;
mod parser;
pub mod render;
mod text;
mod typst;

pub use block::{Block, List, Quote};
pub use config::{Config, HtmlConfig, LinksConfig, PageConfig};
pub use error::{Error, Result};
pub use inline::parse_inline;
pub use parser::MarkdownParser;
pub use render::{BlockCollector, HtmlRenderer, Renderer};
pub use text::{Segment, Style, TextNode};

use std::path::Path;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut parser = MarkdownParser::new(BlockCollector::new());
    parser.parse(markdown);
    parser.into_renderer().into_blocks()
}

/// Convert markdown to HTML using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to HTML with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> String {
    let mut parser = MarkdownParser::new(HtmlRenderer::new(config.html.clone()));
    parser.parse(markdown);
    parser.into_renderer().into_html()
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    typst::blocks_to_typst(&blocks, config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Compile markdown to a Typst document. Local image paths resolve
/// against `root`.
fn compile_document(
    markdown: &str,
    config: &Config,
    root: &Path,
) -> Result<typst_library::layout::PagedDocument> {
    let typst_content = markdown_to_typst_with_config(markdown, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .with_file_system_resolver(root.to_path_buf())
        .build();

    engine
        .compile()
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))
}

/// Convert markdown to PDF bytes with custom config, resolving images
/// against the working directory.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    markdown_to_pdf_with_root(markdown, config, Path::new("."))
}

/// Convert markdown to PDF bytes, resolving local images against `root`
/// (usually the directory of the markdown file).
pub fn markdown_to_pdf_with_root(
    markdown: &str,
    config: &Config,
    root: &Path,
) -> Result<Vec<u8>> {
    let doc = compile_document(markdown, config, root)?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Pdf(format!("{:?}", e)))
}

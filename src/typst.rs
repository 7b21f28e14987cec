use crate::block::{Block, List, Quote};
use crate::config::Config;
use crate::text::{Segment, TextNode};

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();
    preamble(config, &mut out);

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn preamble(config: &Config, out: &mut String) {
    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str("#show link: set text(fill: rgb(");
    push_string(&config.links.color, out);
    out.push_str("))\n");
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
    if config.page.toc {
        out.push_str("#outline()\n\n");
    }
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            text_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            text_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Text(text) => {
            escape_text(text, true, out);
            out.push_str("\n\n");
        }
        Block::CodeBlock { language, content } => {
            // A fence longer than any backtick run inside keeps the body raw
            let fence = "`".repeat(longest_backtick_run(content).max(2) + 1);
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::List(list) => {
            // Wrap list to keep together when small, allow breaks when large
            if list.items.len() <= 5 {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(list, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(list, out);
                out.push('\n');
            }
        }
        Block::Table { headers, rows } => {
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(headers, rows, out);
            out.push_str("]\n\n");
        }
        Block::BlockQuote(quotes) => {
            for quote in quotes {
                quote_to_typst(quote, out);
            }
        }
        Block::Rule => {
            out.push_str("#line(length: 100%)\n\n");
        }
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

fn text_to_typst(text: &TextNode, out: &mut String) {
    for (i, segment) in text.iter().enumerate() {
        segment_to_typst(segment, i == 0, out);
    }
}

/// Local paths are embedded; remote URLs and data URIs stay links.
fn is_local(target: &str) -> bool {
    !target.contains("://") && !target.starts_with("data:")
}

fn segment_to_typst(segment: &Segment, block_start: bool, out: &mut String) {
    let style = segment.style;
    let target = segment.target.as_deref();
    let embed = style.image && target.is_some_and(is_local);
    let mut open = 0;

    if let (true, false, Some(target)) = (style.link || style.image, embed, target) {
        out.push_str("#link(");
        push_string(target, out);
        out.push_str(")[");
        open += 1;
    }
    for (on, func) in [
        (style.bold, "#strong["),
        (style.italic, "#emph["),
        (style.strikethrough, "#strike["),
    ] {
        if on {
            out.push_str(func);
            open += 1;
        }
    }

    match target {
        Some(path) if embed => {
            out.push_str("#image(");
            push_string(path, out);
            out.push_str(", alt: ");
            push_string(segment.description.as_deref().unwrap_or(&segment.value), out);
            out.push(')');
        }
        _ if style.code => {
            out.push_str("#raw(");
            push_string(&segment.value, out);
            out.push(')');
        }
        _ => escape_text(&segment.value, block_start, out),
    }

    for _ in 0..open {
        out.push(']');
    }
}

/// Escapes `text`, plus the markers Typst would read as structure at its
/// start.
fn escape_text(text: &str, block_start: bool, out: &mut String) {
    // A leading dot would read as a field access on a preceding call
    if text.starts_with('.') {
        out.push('\\');
    }
    if block_start {
        if text.starts_with(['-', '+']) {
            out.push('\\');
        } else {
            let digits = text.chars().take_while(char::is_ascii_digit).count();
            if digits > 0 && text[digits..].starts_with('.') {
                out.push_str(&text[..digits]);
                out.push('\\');
                escape(&text[digits..], out);
                return;
            }
        }
    }
    escape(text, out);
}

/// Escape special Typst characters
fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '~' | '=' | '/'
            | '(' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

/// Writes a Typst string literal.
fn push_string(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn list_to_typst(list: &List, out: &mut String) {
    let prefix = if list.ordered { "+" } else { "-" };

    for item in &list.items {
        out.push_str(prefix);
        out.push(' ');
        text_to_typst(item, out);
        out.push('\n');
    }
}

fn table_to_typst(headers: &[TextNode], rows: &[Vec<TextNode>], out: &mut String) {
    let col_count = headers.len();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    // Header cells (bold)
    for cell in headers {
        if cell.is_empty() {
            out.push_str("  [],\n");
            continue;
        }
        out.push_str("  [*");
        text_to_typst(cell, out);
        out.push_str("*],\n");
    }

    // Data rows, padded so short rows keep the grid aligned
    for row in rows {
        for cell in row.iter().take(col_count) {
            out.push_str("  [");
            text_to_typst(cell, out);
            out.push_str("],\n");
        }
        for _ in row.len()..col_count {
            out.push_str("  [],\n");
        }
    }

    out.push_str(")\n");
}

fn quote_to_typst(quote: &Quote, out: &mut String) {
    let level = quote.level.max(1);
    for _ in 0..level {
        out.push_str("#quote(block: true)[");
    }
    text_to_typst(&quote.content, out);
    for _ in 0..level {
        out.push(']');
    }
    out.push_str("\n\n");
}

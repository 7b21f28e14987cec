use tracing::debug;

use crate::cursor::{Cursor, EOF};
use crate::error::{Error, Result};
use crate::inline::{Termination, parse_inline, parse_text};
use crate::line;
use crate::render::Renderer;
use crate::text::TextNode;

/// Scans markdown into block events and feeds them to a [`Renderer`].
#[derive(Debug)]
pub struct MarkdownParser<R> {
    renderer: R,
}

impl<R: Renderer> MarkdownParser<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Parses the whole of `text`.
    pub fn parse(&mut self, text: &str) {
        let text = normalize(text);
        Scanner::new(Cursor::new(&text), &mut self.renderer).run();
    }

    /// Parses `text` starting `offset` characters in. Offsets count
    /// characters after `\r\n` has been folded to `\n`.
    pub fn parse_from(&mut self, text: &str, offset: usize) -> Result<()> {
        let cursor = Cursor::at(&normalize(text), offset);
        if offset > cursor.len() {
            return Err(Error::OffsetOutOfRange {
                offset,
                len: cursor.len(),
            });
        }
        Scanner::new(cursor, &mut self.renderer).run();
        Ok(())
    }
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

struct Scanner<'r, R> {
    cursor: Cursor,
    renderer: &'r mut R,
}

impl<'r, R: Renderer> Scanner<'r, R> {
    fn new(cursor: Cursor, renderer: &'r mut R) -> Self {
        Self { cursor, renderer }
    }

    fn run(mut self) {
        self.renderer.body();

        while !self.cursor.is_eof() {
            if self.cursor.current() == '\n' {
                self.cursor.advance();
                continue;
            }

            let start = self.cursor.pos();
            let line = self.cursor.peek_line(0).unwrap_or_default();
            let matched = self.rule()
                || self.heading()
                || self.block_quote(&line)
                || self.list(&line)
                || self.table(&line)
                || self.code_block(&line);
            if !matched {
                self.paragraph();
            }

            if self.cursor.pos() == start {
                let c = self.cursor.current();
                self.renderer.append(&c.to_string());
                self.cursor.advance();
            }
        }

        self.renderer.done();
    }

    fn rule(&mut self) -> bool {
        let found = ["---\n", "***\n", "___\n"]
            .iter()
            .any(|rule| self.cursor.starts_with(rule));
        if found {
            debug!(at = self.cursor.pos(), "rule");
            self.cursor.advance_by(4);
            self.renderer.hr();
        }
        found
    }

    fn heading(&mut self) -> bool {
        let mut hashes = 0;
        while self.cursor.peek(hashes) == '#' {
            hashes += 1;
        }
        if hashes == 0 {
            return false;
        }

        if hashes > 6 {
            // Too deep to be a heading, and not a paragraph either.
            let text = self.cursor.read_line().unwrap_or_default();
            self.renderer.append(&text);
            return true;
        }
        if self.cursor.peek(hashes) != ' ' {
            return false;
        }

        self.cursor.advance_by(hashes + 1);
        self.cursor.skip_blanks();
        let text = parse_text(&mut self.cursor, Termination::Line);
        debug!(level = hashes, "heading");
        self.renderer.heading(hashes as u8, text);
        true
    }

    fn block_quote(&mut self, line: &str) -> bool {
        if line::quote_level(line) == 0 {
            return false;
        }

        self.renderer.start_blockquote();
        let mut groups = 0;
        while let Some(first) = self.cursor.peek_line(0) {
            let level = line::quote_level(&first);
            if level == 0 {
                break;
            }

            let mut group = Vec::new();
            while let Some(next) = self.cursor.peek_line(0) {
                if line::quote_level(&next) != level {
                    break;
                }
                self.cursor.read_line();
                let content = next[level..].trim();
                // A marker-only line closes the group.
                if content.is_empty() {
                    break;
                }
                group.push(content.to_string());
            }
            if group.is_empty() {
                continue;
            }

            debug!(level, lines = group.len(), "quote group");
            self.renderer.blockquote(parse_inline(&group.join(" ")), level);
            groups += 1;
        }
        if groups == 0 {
            self.renderer.blockquote(TextNode::default(), line::quote_level(line));
        }
        self.renderer.end_blockquote();
        true
    }

    fn list(&mut self, line: &str) -> bool {
        let ordered = if line::is_ordered_item(line) {
            true
        } else if line::is_unordered_item(line) {
            false
        } else {
            return false;
        };
        let item: fn(&str) -> bool = if ordered {
            line::is_ordered_item
        } else {
            line::is_unordered_item
        };

        let mut items = Vec::new();
        while let Some(next) = self.cursor.peek_line(0) {
            if !item(&next) {
                break;
            }
            let mut text = parse_text(&mut self.cursor, Termination::Paragraph);
            strip_marker(&mut text);
            items.push(text);

            // A blank line already consumed the item's own newline and ends
            // the list; otherwise step onto the next line.
            let at = self.cursor.pos();
            if self.cursor.current() == '\n' && self.cursor.char_before(at) != '\n' {
                self.cursor.advance();
            }
        }

        debug!(ordered, items = items.len(), "list");
        if ordered {
            self.renderer.ol(items);
        } else {
            self.renderer.ul(items);
        }
        true
    }

    fn table(&mut self, line: &str) -> bool {
        let Some(columns) = line::header_columns(line) else {
            return false;
        };
        let separator_at = line.chars().count() + 1;
        match self.cursor.peek_line(separator_at) {
            Some(separator) if line::is_separator(&separator, columns) => {}
            _ => return false,
        }

        let headings = self.row(columns);
        self.renderer.table(headings);
        self.cursor.read_line();

        let mut rows = 0;
        while let Some(next) = self.cursor.peek_line(0) {
            if !line::row_cells(&next).is_some_and(|cells| cells.len() >= columns) {
                break;
            }
            let cells = self.row(columns);
            self.renderer.tr(cells);
            rows += 1;
        }

        debug!(columns, rows, "table");
        self.renderer.end_table();
        true
    }

    /// Reads one table row of `columns` cells. Extra cells are skipped.
    fn row(&mut self, columns: usize) -> Vec<TextNode> {
        self.cursor.skip_blanks();
        if self.cursor.current() == '|' {
            self.cursor.advance();
        }

        let mut cells = Vec::with_capacity(columns);
        while cells.len() < columns && !matches!(self.cursor.current(), '\n' | EOF) {
            let cell = parse_text(&mut self.cursor, Termination::Cell('|'));
            cells.push(trim_cell(cell));
            if self.cursor.current() == '|' {
                self.cursor.advance();
            }
        }
        self.cursor.read_line();
        // A pipe inside a code span is not a cell boundary, so the row can
        // come up short of the column count.
        cells.resize_with(columns, TextNode::default);
        cells
    }

    fn code_block(&mut self, line: &str) -> bool {
        if !line::is_fence(line) {
            return false;
        }

        self.cursor.advance_by(3);
        let language = self.cursor.read_until('\n').trim().to_string();
        let mut body = Vec::new();
        while let Some(next) = self.cursor.read_line() {
            if next == "```" {
                break;
            }
            body.push(next);
        }

        debug!(language = %language, lines = body.len(), "code block");
        let language = (!language.is_empty()).then_some(language.as_str());
        self.renderer.codeblock(&body.join("\n"), language);
        true
    }

    fn paragraph(&mut self) {
        let text = parse_text(&mut self.cursor, Termination::Paragraph);
        if !text.is_empty() {
            self.renderer.p(text);
        }
    }
}

/// Drops a list marker and the space after it from the item's first
/// segment, and the segment itself if nothing is left.
fn strip_marker(item: &mut TextNode) {
    let Some(first) = item.segments.first_mut() else {
        return;
    };
    if let Some(space) = first.value.find(' ') {
        first.value.drain(..=space);
    }
    if first.value.is_empty() {
        item.segments.remove(0);
    }
}

/// Trims the outer edges of a cell and drops segments left empty.
fn trim_cell(mut cell: TextNode) -> TextNode {
    if let Some(first) = cell.segments.first_mut() {
        first.value = first.value.trim_start().to_string();
    }
    if let Some(last) = cell.segments.last_mut() {
        last.value = last.value.trim_end().to_string();
    }
    cell.segments.retain(|segment| !segment.value.is_empty());
    cell
}

//! Inline parser: turns emphasis, strike, code, link and image markup into
//! a [`TextNode`] of styled segments.
//!
//! The active style is a plain value threaded through every handler. A
//! handler that recognizes markup under the cursor consumes it and returns
//! the style in effect afterwards; `None` means the character is literal.

use tracing::trace;

use crate::cursor::Cursor;
use crate::line;
use crate::pairing::{can_pair, is_intraword, is_space_flanked};
use crate::text::{Segment, Style, TextNode};

/// Where an inline run stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Folds soft line breaks and runs to the next block boundary.
    Paragraph,
    /// Stops at the first newline, leaving it unconsumed.
    Line,
    /// Stops before the given character or at the first newline.
    Cell(char),
}

/// Parses `text` in a fresh context of its own.
pub fn parse_inline(text: &str) -> TextNode {
    let text = text.replace("\r\n", "\n");
    let mut cursor = Cursor::new(&text);
    parse_text(&mut cursor, Termination::Paragraph)
}

/// Parses from the cursor position until `until` says stop.
pub(crate) fn parse_text(cursor: &mut Cursor, until: Termination) -> TextNode {
    InlineParser {
        cursor,
        until,
        node: TextNode::default(),
        buffer: String::new(),
        link_open: None,
    }
    .run()
}

#[derive(Clone, Copy)]
enum Flag {
    Bold,
    Italic,
    Strike,
}

fn flag_mut(style: &mut Style, flag: Flag) -> &mut bool {
    match flag {
        Flag::Bold => &mut style.bold,
        Flag::Italic => &mut style.italic,
        Flag::Strike => &mut style.strikethrough,
    }
}

/// Where an open link or image started, so an unclosed one can put its
/// opening bracket back.
struct LinkOpen {
    segment: usize,
    offset: usize,
    style: Style,
}

struct InlineParser<'c> {
    cursor: &'c mut Cursor,
    until: Termination,
    node: TextNode,
    buffer: String,
    link_open: Option<LinkOpen>,
}

impl InlineParser<'_> {
    fn run(mut self) -> TextNode {
        let mut style = Style::default();

        while !self.cursor.is_eof() {
            let c = self.cursor.current();
            if self.until == Termination::Cell(c) {
                break;
            }
            if c == '\n' {
                style = self.abandon_link(style);
                if !self.soft_break() {
                    break;
                }
                style = Style::default();
                continue;
            }

            let next = self.cursor.peek(1);
            if c == '\\' && next.is_ascii_punctuation() {
                self.buffer.push(next);
                self.cursor.advance_by(2);
                continue;
            }

            if let Some(next_style) = self.markup(style) {
                style = next_style;
                continue;
            }

            self.buffer.push(c);
            self.cursor.advance();
        }

        let style = self.abandon_link(style);
        self.flush(style);
        self.node
    }

    /// Handles the newline under the cursor. Returns false when the run
    /// ends here.
    fn soft_break(&mut self) -> bool {
        if self.until != Termination::Paragraph {
            return false;
        }
        match self.cursor.peek_line(1) {
            None => {
                self.cursor.advance();
                return false;
            }
            Some(next) if line::starts_block(&next) => return false,
            Some(next) if line::is_blank(&next) => {
                self.cursor.advance();
                return false;
            }
            Some(_) => {}
        }

        let at = self.cursor.pos();
        if self.cursor.char_before(at) == ' ' && self.cursor.char_before(at - 1) == ' ' {
            if self.buffer.ends_with("  ") {
                self.buffer.truncate(self.buffer.len() - 2);
            }
            trace!(at, "hard line break");
            return false;
        }

        self.buffer.push(' ');
        self.cursor.advance();
        true
    }

    fn markup(&mut self, style: Style) -> Option<Style> {
        self.single_asterisk(style)
            .or_else(|| self.double_asterisk(style))
            .or_else(|| self.single_underscore(style))
            .or_else(|| self.double_underscore(style))
            .or_else(|| self.double_tilde(style))
            .or_else(|| self.inline_code(style))
            .or_else(|| self.link(style))
    }

    fn single_asterisk(&mut self, style: Style) -> Option<Style> {
        if self.cursor.current() != '*' || self.cursor.peek(1) == '*' {
            return None;
        }
        self.toggle(style, "*", true, Flag::Italic)
    }

    fn double_asterisk(&mut self, style: Style) -> Option<Style> {
        if !self.cursor.starts_with("**") {
            return None;
        }
        self.toggle(style, "**", true, Flag::Bold)
    }

    fn single_underscore(&mut self, style: Style) -> Option<Style> {
        if self.cursor.current() != '_' || self.cursor.peek(1) == '_' {
            return None;
        }
        if is_intraword(self.cursor, self.cursor.pos(), 1) {
            return None;
        }
        self.toggle(style, "_", true, Flag::Italic)
    }

    fn double_underscore(&mut self, style: Style) -> Option<Style> {
        if !self.cursor.starts_with("__") || is_intraword(self.cursor, self.cursor.pos(), 2) {
            return None;
        }
        // Unlike `**`, a closing `__` may follow whitespace.
        self.toggle(style, "__", false, Flag::Bold)
    }

    fn double_tilde(&mut self, style: Style) -> Option<Style> {
        if !self.cursor.starts_with("~~") {
            return None;
        }
        self.toggle(style, "~~", true, Flag::Strike)
    }

    /// Opens the flag if a partner is reachable, closes it if it is on.
    fn toggle(
        &mut self,
        style: Style,
        delimiter: &str,
        ignore_space_prefixed: bool,
        flag: Flag,
    ) -> Option<Style> {
        let len = delimiter.len();
        if is_space_flanked(self.cursor, self.cursor.pos(), len) {
            return None;
        }

        let mut next = style;
        let active = flag_mut(&mut next, flag);
        if !*active && !can_pair(self.cursor, delimiter, ignore_space_prefixed) {
            return None;
        }
        *active = !*active;

        self.flush(style);
        self.cursor.advance_by(len);
        Some(next)
    }

    fn inline_code(&mut self, style: Style) -> Option<Style> {
        if self.cursor.current() != '`' {
            return None;
        }
        let open = self.cursor.pos();
        let close = self.cursor.find_on_same_line("`", open + 1)?;

        if close == open + 1 {
            self.buffer.push_str("``");
        } else {
            self.flush(style);
            let code = self.cursor.slice(open + 1, close);
            if !code.trim().is_empty() {
                let code_style = Style {
                    code: true,
                    ..Style::default()
                };
                self.node.push(Segment::new(code, code_style));
            }
        }
        self.cursor.advance_by(close + 1 - open);
        Some(style)
    }

    fn link(&mut self, style: Style) -> Option<Style> {
        let in_link = style.link || style.image;
        match self.cursor.current() {
            '[' if !in_link => Some(self.open_link(style, false)),
            '!' if !in_link && self.cursor.peek(1) == '[' => Some(self.open_link(style, true)),
            ']' if in_link => Some(self.close_link(style)),
            _ => None,
        }
    }

    fn open_link(&mut self, style: Style, image: bool) -> Style {
        self.flush(style);
        self.link_open = Some(LinkOpen {
            segment: self.node.len(),
            offset: self.buffer.len(),
            style,
        });
        self.cursor.advance_by(if image { 2 } else { 1 });
        Style {
            link: !image,
            image,
            ..style
        }
    }

    fn close_link(&mut self, style: Style) -> Style {
        let closed = Style {
            link: false,
            image: false,
            ..style
        };
        let bracket = self.cursor.pos();
        let target_end = match self.cursor.peek(1) {
            '(' => self.cursor.find_on_same_line(")", bracket + 2),
            _ => None,
        };
        let opened = self.link_open.take();

        if let Some(end) = target_end {
            let description = self.buffer.trim().to_string();
            self.buffer.clear();
            self.node.push(Segment {
                value: description.clone(),
                style,
                description: Some(description),
                target: Some(self.cursor.slice(bracket + 2, end)),
            });
            self.cursor.advance_by(end + 1 - bracket);
            return closed;
        }

        // No target: the brackets were plain text all along.
        if let Some(open) = opened {
            self.restore_opener(open, style.image);
        }
        self.buffer.push(']');
        self.cursor.advance();
        closed
    }

    /// Turns a link or image still open at a line or run end back into
    /// plain text.
    fn abandon_link(&mut self, style: Style) -> Style {
        let Some(open) = self.link_open.take() else {
            return style;
        };
        trace!(at = self.cursor.pos(), "unclosed link");
        self.restore_opener(open, style.image);
        Style {
            link: false,
            image: false,
            ..style
        }
    }

    /// Puts the opening bracket back and clears the link flags of
    /// everything emitted since.
    fn restore_opener(&mut self, open: LinkOpen, image: bool) {
        let opener = if image { "![" } else { "[" };
        if open.segment == self.node.len() {
            self.buffer.insert_str(open.offset, opener);
            return;
        }
        for segment in &mut self.node.segments[open.segment..] {
            segment.style.link = false;
            segment.style.image = false;
        }
        let plain = Style {
            link: false,
            image: false,
            ..open.style
        };
        self.node
            .segments
            .insert(open.segment, Segment::new(opener, plain));
    }

    /// Moves the buffer into a new segment. Whitespace-only buffers are
    /// kept for the next segment instead.
    fn flush(&mut self, style: Style) {
        if self.buffer.trim().is_empty() {
            return;
        }
        let value = std::mem::take(&mut self.buffer);
        self.node.push(Segment::new(value, style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn bold() -> Style {
        Style {
            bold: true,
            ..Style::default()
        }
    }

    fn italic() -> Style {
        Style {
            italic: true,
            ..Style::default()
        }
    }

    fn values(node: &TextNode) -> Vec<&str> {
        node.iter().map(|s| s.value.as_str()).collect()
    }

    #[rstest]
    #[case("hello world")]
    #[case("abc 123 def")]
    #[case("x")]
    fn plain_text_is_one_segment(#[case] text: &str) {
        let node = parse_inline(text);
        assert_eq!(node.segments, vec![Segment::new(text, Style::default())]);

        let again = parse_inline(&node.plain_text());
        assert_eq!(again, node);
    }

    #[rstest]
    #[case("**a**", bold())]
    #[case("__a__", bold())]
    #[case("*a*", italic())]
    #[case("_a_", italic())]
    #[case("~~a~~", Style { strikethrough: true, ..Style::default() })]
    #[case("`a`", Style { code: true, ..Style::default() })]
    fn single_styled_segment(#[case] text: &str, #[case] style: Style) {
        let node = parse_inline(text);
        assert_eq!(node.segments, vec![Segment::new("a", style)]);
    }

    #[test]
    fn interleaved_delimiters() {
        let node = parse_inline("asd*as**d*asd**123*\n*123**123");
        assert_eq!(
            values(&node),
            vec!["asd", "as", "d", "asd", "123* ", "123*", "123"]
        );
        let both = node.segments[2].style;
        assert!(both.bold && both.italic);
        assert_eq!(node.segments[3].style, bold());
        assert_eq!(node.segments[5].style, italic());
    }

    #[test]
    fn interleaved_delimiters_single_line() {
        let node = parse_inline("asd*as**d*asd**");
        assert_eq!(values(&node), vec!["asd", "as", "d", "asd"]);
        assert_eq!(node.segments[1].style, italic());
        assert!(node.segments[2].style.bold && node.segments[2].style.italic);
        assert_eq!(node.segments[3].style, bold());
    }

    #[test]
    fn styles_reset_at_soft_break_and_stop_at_blank_line() {
        let node = parse_inline("***asdasd***\ntext asdasd~~asd~~1~2~3\n\nasd*as**d*asd**");
        assert_eq!(values(&node), vec!["asdasd", " text asdasd", "asd", "1~2~3"]);
        assert!(node.segments[0].style.bold && node.segments[0].style.italic);
        assert!(node.segments[1].style.is_plain());
        assert!(node.segments[2].style.strikethrough);
    }

    #[rstest]
    #[case("a * b")]
    #[case("a ** b")]
    #[case("a ~~ b")]
    #[case("snake_case_name")]
    #[case("1~2~3")]
    fn literal_delimiters(#[case] text: &str) {
        let node = parse_inline(text);
        assert_eq!(node.segments, vec![Segment::new(text, Style::default())]);
    }

    #[test]
    fn double_underscore_closes_after_space() {
        let node = parse_inline("__a __b");
        assert_eq!(values(&node), vec!["a ", "b"]);
        assert_eq!(node.segments[0].style, bold());

        let node = parse_inline("**a **b");
        assert!(node.iter().all(|s| !s.style.bold));
    }

    #[test]
    fn code_span_is_opaque() {
        let node = parse_inline("asd*as`*asd`");
        assert_eq!(values(&node), vec!["asd*as", "*asd"]);
        assert!(node.segments[0].style.is_plain());
        assert!(node.segments[1].style.code);
    }

    #[test]
    fn empty_code_span_is_literal() {
        let node = parse_inline("a `` b");
        assert_eq!(values(&node), vec!["a `` b"]);
    }

    #[test]
    fn escapes_bypass_markup() {
        let node = parse_inline(r"\*a\* \_b\_ \`c\`");
        assert_eq!(values(&node), vec!["*a* _b_ `c`"]);
    }

    #[test]
    fn link_inside_emphasis() {
        let node = parse_inline("asd*[momomia](https://google.com)*asd");
        assert_eq!(node.len(), 3);
        let link = &node.segments[1];
        assert_eq!(link.description.as_deref(), Some("momomia"));
        assert_eq!(link.target.as_deref(), Some("https://google.com"));
        assert!(link.style.link && link.style.italic);
        assert_eq!(node.segments[2].value, "asd");
    }

    #[test]
    fn image_inside_emphasis() {
        let node = parse_inline("asd*![momomia](https://google.com)a*sd");
        assert_eq!(values(&node), vec!["asd", "momomia", "a", "sd"]);
        let image = &node.segments[1];
        assert!(image.style.image && image.style.italic);
        assert!(!image.style.link);
        assert_eq!(image.target.as_deref(), Some("https://google.com"));
        assert_eq!(node.segments[2].style, italic());
        assert!(node.segments[3].style.is_plain());
    }

    #[test]
    fn unmatched_brackets_stay_literal() {
        let node = parse_inline("a [b] c");
        assert_eq!(node.plain_text(), "a [b] c");
        assert!(node.iter().all(|s| !s.style.link && s.target.is_none()));

        let node = parse_inline("see [**x**] now");
        assert_eq!(node.plain_text(), "see [x] now");
        assert!(node.iter().all(|s| !s.style.link));
    }

    #[rstest]
    #[case("a [b c", "a [b c")]
    #[case("a [b\nc] d", "a [b c] d")]
    #[case("x ![alt", "x ![alt")]
    #[case("a [**b** c", "a [b c")]
    fn unclosed_brackets_stay_literal(#[case] text: &str, #[case] expected: &str) {
        let node = parse_inline(text);
        assert_eq!(node.plain_text(), expected);
        assert!(node.iter().all(|s| !s.style.link && !s.style.image));
    }

    #[test]
    fn unclosed_bracket_in_cell() {
        let mut cursor = Cursor::new("[a|b");
        let node = parse_text(&mut cursor, Termination::Cell('|'));
        assert_eq!(node.segments, vec![Segment::new("[a", Style::default())]);
    }

    #[test]
    fn soft_break_folds_to_space() {
        assert_eq!(values(&parse_inline("a\nb")), vec!["a b"]);
    }

    #[test]
    fn hard_break_ends_the_run() {
        let mut cursor = Cursor::new("a  \nb");
        let node = parse_text(&mut cursor, Termination::Paragraph);
        assert_eq!(values(&node), vec!["a"]);
        assert_eq!(cursor.current(), '\n');
    }

    #[test]
    fn blank_line_consumes_newline() {
        let mut cursor = Cursor::new("a\n\nb");
        let node = parse_text(&mut cursor, Termination::Paragraph);
        assert_eq!(values(&node), vec!["a"]);
        assert_eq!(cursor.pos(), 2);
    }

    #[rstest]
    #[case("a\n- b")]
    #[case("a\n1. b")]
    #[case("a\n# b")]
    #[case("a\n> b")]
    #[case("a\n```")]
    fn block_starter_ends_the_run(#[case] text: &str) {
        let mut cursor = Cursor::new(text);
        let node = parse_text(&mut cursor, Termination::Paragraph);
        assert_eq!(values(&node), vec!["a"]);
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn line_mode_stops_at_newline() {
        let mut cursor = Cursor::new("title\nbody");
        let node = parse_text(&mut cursor, Termination::Line);
        assert_eq!(values(&node), vec!["title"]);
        assert_eq!(cursor.current(), '\n');
    }

    #[test]
    fn cell_mode_stops_before_terminator() {
        let mut cursor = Cursor::new("**b**|c");
        let node = parse_text(&mut cursor, Termination::Cell('|'));
        assert_eq!(node.segments, vec![Segment::new("b", bold())]);
        assert_eq!(cursor.current(), '|');

        let mut cursor = Cursor::new(r"a\|b|c");
        let node = parse_text(&mut cursor, Termination::Cell('|'));
        assert_eq!(values(&node), vec!["a|b"]);
    }
}

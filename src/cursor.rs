/// Returned by the cursor accessors at or past the end of the input.
pub const EOF: char = '\0';

/// A character-addressed cursor over the whole input.
///
/// Every position is an absolute character offset. Lookahead never copies
/// text except when a caller asks for a materialized line or slice.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    /// Creates a cursor at the start of `text`.
    pub fn new(text: &str) -> Self {
        Self::at(text, 0)
    }

    /// Creates a cursor at character offset `pos` of `text`.
    pub fn at(text: &str, pos: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// The character under the cursor, or [`EOF`].
    pub fn current(&self) -> char {
        self.char_at(self.pos)
    }

    /// The character `n` positions ahead of the cursor, or [`EOF`].
    pub fn peek(&self, n: usize) -> char {
        self.char_at(self.pos + n)
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars.get(index).copied().unwrap_or(EOF)
    }

    /// The character just before `index`, or [`EOF`] at the start of input.
    pub fn char_before(&self, index: usize) -> char {
        index.checked_sub(1).map_or(EOF, |i| self.char_at(i))
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.starts_with_at(self.pos, pat)
    }

    pub fn starts_with_at(&self, index: usize, pat: &str) -> bool {
        let mut i = index;
        for c in pat.chars() {
            if i >= self.chars.len() || self.chars[i] != c {
                return false;
            }
            i += 1;
        }
        true
    }

    /// The rest of the logical line starting `offset` characters ahead,
    /// without its newline. `None` once that start is past the input.
    pub fn peek_line(&self, offset: usize) -> Option<String> {
        let start = self.pos + offset;
        if start >= self.chars.len() {
            return None;
        }
        let end = self.line_end(start);
        Some(self.slice(start, end))
    }

    /// Consumes the rest of the current line and its newline.
    pub fn read_line(&mut self) -> Option<String> {
        if self.is_eof() {
            return None;
        }
        let end = self.line_end(self.pos);
        let line = self.slice(self.pos, end);
        self.pos = (end + 1).min(self.chars.len());
        Some(line)
    }

    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    pub fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    /// Skips spaces and tabs, never newlines.
    pub fn skip_blanks(&mut self) {
        while matches!(self.current(), ' ' | '\t') {
            self.pos += 1;
        }
    }

    /// Reads up to (not including) `c`, then consumes `c` if present.
    pub fn read_until(&mut self, c: char) -> String {
        let start = self.pos;
        while !self.is_eof() && self.current() != c {
            self.pos += 1;
        }
        let out = self.slice(start, self.pos);
        self.advance();
        out
    }

    /// Position of the next `needle` at or after `from`, stopping at the
    /// first newline. `needle` must not itself contain a newline.
    pub fn find_on_same_line(&self, needle: &str, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() && self.chars[i] != '\n' {
            if self.starts_with_at(i, needle) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        if start >= end {
            return String::new();
        }
        self.chars[start..end].iter().collect()
    }

    fn line_end(&self, from: usize) -> usize {
        self.chars[from.min(self.chars.len())..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.chars.len(), |i| from + i)
    }
}

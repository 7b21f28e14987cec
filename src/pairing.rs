//! Decides whether an opening delimiter has a reachable partner.
//!
//! A partner must sit on the same line as the opener and before the first
//! inline code span on that line: newlines and code spans are barriers.

use tracing::trace;

use crate::cursor::{Cursor, EOF};

/// Whitespace for the purpose of delimiter flanking. Line and input edges
/// count as whitespace.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | EOF)
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A delimiter of `len` characters at `at` with whitespace on both sides.
/// Such a delimiter can neither open nor close a run.
pub fn is_space_flanked(cursor: &Cursor, at: usize, len: usize) -> bool {
    is_space(cursor.char_before(at)) && is_space(cursor.char_at(at + len))
}

/// A delimiter of `len` characters at `at` sitting inside a word, as in
/// `snake_case`.
pub fn is_intraword(cursor: &Cursor, at: usize, len: usize) -> bool {
    is_word(cursor.char_before(at)) && is_word(cursor.char_at(at + len))
}

/// Start of the first code span (a backtick with a closing backtick later
/// on the same line) at or after `from`.
fn code_span_start(cursor: &Cursor, from: usize) -> Option<usize> {
    let open = cursor.find_on_same_line("`", from)?;
    cursor.find_on_same_line("`", open + 1).map(|_| open)
}

/// Whether the delimiter under the cursor has a valid closing partner.
///
/// With `ignore_space_prefixed`, a candidate directly after whitespace is
/// skipped and the search continues past it.
pub fn can_pair(cursor: &Cursor, delimiter: &str, ignore_space_prefixed: bool) -> bool {
    let len = delimiter.chars().count();
    let barrier = code_span_start(cursor, cursor.pos() + 1);
    let underscore = delimiter.starts_with('_');

    let mut from = cursor.pos() + len;
    while let Some(at) = cursor.find_on_same_line(delimiter, from) {
        if barrier.is_some_and(|b| at > b) {
            trace!(delimiter, at, "candidate behind code span");
            return false;
        }
        from = at + 1;
        if is_space_flanked(cursor, at, len) {
            continue;
        }
        if ignore_space_prefixed && is_space(cursor.char_before(at)) {
            continue;
        }
        if underscore && is_intraword(cursor, at, len) {
            continue;
        }
        trace!(delimiter, open = cursor.pos(), close = at, "paired");
        return true;
    }
    false
}

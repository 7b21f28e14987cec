//! Whole-line predicates used by the block scanner and by the inline
//! parser when it looks one line ahead.

/// `1. item`: one or more digits, a dot, then a space.
pub fn is_ordered_item(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with(". ")
}

/// `- item`, `* item` or `+ item`.
pub fn is_unordered_item(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('-' | '*' | '+')) && chars.next() == Some(' ')
}

pub fn is_fence(line: &str) -> bool {
    line.starts_with("```")
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of leading `>` markers.
pub fn quote_level(line: &str) -> usize {
    line.chars().take_while(|&c| c == '>').count()
}

/// Lines that end a running paragraph because they open a block of their own.
pub fn starts_block(line: &str) -> bool {
    is_ordered_item(line)
        || is_unordered_item(line)
        || line.starts_with('#')
        || line.starts_with('>')
        || is_fence(line)
}

/// Splits on unescaped pipes.
fn split_cells(inner: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        match c {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '|' if !escaped => {
                cells.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        escaped = false;
    }
    cells.push(&inner[start..]);
    cells
}

fn has_pipe(line: &str) -> bool {
    split_cells(line).len() > 1
}

/// Cells of a row whose outer pipes are both optional.
pub fn row_cells(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    if !has_pipe(trimmed) {
        return None;
    }
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };
    Some(split_cells(inner))
}

/// Column count of a table header line. A leading pipe requires a
/// trailing one.
pub fn header_columns(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    if trimmed.starts_with('|')
        && (trimmed.len() < 2 || !trimmed.ends_with('|') || trimmed.ends_with("\\|"))
    {
        return None;
    }
    row_cells(trimmed).map(|cells| cells.len())
}

/// A separator row made of dashes and spaces with at least `columns` cells.
pub fn is_separator(line: &str, columns: usize) -> bool {
    let Some(cells) = row_cells(line) else {
        return false;
    };
    cells.len() >= columns
        && line.contains('-')
        && cells
            .iter()
            .all(|cell| cell.chars().all(|c| matches!(c, '-' | ' ' | '\t')))
}

//! Hard-wrapping and dimensional constants for the InputBox.
//!
//! The input is wrapped by display width, not at word boundaries, so every
//! byte of the buffer maps to exactly one visual row and the cursor can be
//! placed without guessing where a word wrapper trimmed whitespace.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Byte ranges of each visual row. `\n` ends a row and belongs to none;
/// a row also ends when the next char would overflow `width` columns.
/// Always returns at least one (possibly empty) row.
pub(super) fn visual_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;

    for (i, c) in text.char_indices() {
        if c == '\n' {
            rows.push(start..i);
            start = i + 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col > 0 && col + w > width {
            rows.push(start..i);
            start = i;
            col = 0;
        }
        col += w;
    }
    rows.push(start..text.len());
    rows
}

/// Visual (row, column) of byte offset `pos`. At a soft-wrap point the
/// cursor belongs to the start of the following row.
pub(super) fn locate(text: &str, pos: usize, width: u16) -> (usize, usize) {
    let rows = visual_rows(text, width);
    let row = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let col = text[rows[row].start..pos].width();
    (row, col)
}

/// Byte offset in `row` whose column is closest to `col` without passing it.
pub(super) fn offset_at_column(text: &str, row: &Range<usize>, col: usize) -> usize {
    let mut used = 0;
    for (i, c) in text[row.clone()].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > col {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

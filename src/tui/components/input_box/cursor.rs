//! Cursor position tracking and navigation for the InputBox.
//!
//! `CursorState` owns the cursor byte offset, scroll offset, and cached width.
//! All navigation methods take `buffer: &str` explicitly; the text itself is
//! owned by `InputBox`.

use ratatui::layout::Rect;

use super::text_wrap::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, inner_width, locate, offset_at_column, visual_rows,
};

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible visual row (0 when content fits in viewport)
    pub scroll_offset: u16,
    /// Area width from the last render, used for vertical movement
    pub last_area_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move one visual row up (`-1`) or down (`1`), keeping the column where
    /// the target row is long enough. Returns `false` at the first/last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_area_width);
        let rows = visual_rows(buffer, width);
        let (row, col) = locate(buffer, self.pos, width);

        let target = if direction < 0 {
            match row.checked_sub(1) {
                Some(r) => r,
                None => return false,
            }
        } else if row + 1 < rows.len() {
            row + 1
        } else {
            return false;
        };

        self.pos = offset_at_column(buffer, &rows[target], col);
        true
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let width = inner_width(area_width);
        let total = visual_rows(buffer, width).len() as u16;
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let (row, _) = locate(buffer, self.pos, width);
        let row = row as u16;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = locate(buffer, self.pos, inner_width(area.width));
        let visible_row = (row as u16).saturating_sub(self.scroll_offset);
        let max_col = area.width.saturating_sub(CONTENT_OFFSET);
        let x = area.x + (CONTENT_OFFSET + col.min(u16::MAX as usize) as u16).min(max_col);
        let y = area.y + 1 + visible_row;
        (x, y)
    }
}

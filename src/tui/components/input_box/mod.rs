//! # InputBox Component
//!
//! The question field at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and multiline entry (Ctrl+J)
//! - Editing: backspace, delete, cursor movement
//! - Submission on Enter, unless the box is disabled or blank
//! - Placeholder text while empty
//!
//! ## State Management
//!
//! The buffer is internal state. `enabled` is a prop: the parent turns it
//! off while an answer is pending, which keeps Enter from clearing what the
//! user typed ahead. Typing stays possible either way.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    visual_rows,
};

pub const PLACEHOLDER: &str = "Ask about Indian Foreign Policy, The Arctic, etc...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
    /// Cursor is already on the first/last row; the parent may scroll instead
    Overflow(TuiEvent),
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether Enter submits (Prop)
    pub enabled: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            enabled: true,
            cursor: CursorState::new(),
        }
    }

    /// Whether Enter would submit right now (mirrors a disabled send button).
    pub fn can_submit(&self) -> bool {
        self.enabled && !self.buffer.trim().is_empty()
    }

    /// Required height for current buffer content, clamped to viewport limits.
    /// Returns value in range [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = visual_rows(&self.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// The slice of visual rows currently scrolled into view, newline-joined.
    fn visible_text(&self, area_width: u16) -> String {
        let rows = visual_rows(&self.buffer, inner_width(area_width));
        let start = (self.cursor.scroll_offset as usize).min(rows.len());
        let end = (start + MAX_VISIBLE_LINES as usize).min(rows.len());
        rows[start..end]
            .iter()
            .map(|r| &self.buffer[r.clone()])
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_area_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let (title, border_style) = if self.enabled {
            (" Ask ", Style::default().fg(Color::Blue))
        } else {
            (" Waiting for answer ", Style::default().fg(Color::DarkGray))
        };
        let hint = if self.can_submit() { " ⏎ send " } else { "" };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(hint)
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.visible_text(area.width)).style(Style::default().fg(Color::White))
        };

        frame.render_widget(paragraph.block(block), area);

        let (x, y) = self.cursor.screen_pos(&self.buffer, area);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp))
            }
            TuiEvent::Paste(text) => self.insert(&text.replace("\r\n", "\n")),
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let direction = if matches!(event, TuiEvent::CursorUp) { -1 } else { 1 };
                if self.cursor.move_vertically(&self.buffer, direction) {
                    Some(InputEvent::ContentChanged)
                } else {
                    Some(InputEvent::Overflow(event.clone()))
                }
            }
            TuiEvent::Submit => self.can_submit().then(|| {
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                InputEvent::Submit(text)
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    fn screen_text(input: &mut InputBox, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("ab");
        assert_eq!(input.buffer, "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = typed("ac");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "abc");
    }

    #[test]
    fn test_delete_multibyte() {
        let mut input = typed("é!");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "!");
    }

    #[test]
    fn test_paste_normalizes_crlf() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\r\ntwo".to_string()));
        assert_eq!(input.buffer, "one\ntwo");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = typed("What about the Arctic?");
        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "What about the Arctic?"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = typed("   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ");
    }

    #[test]
    fn test_disabled_submit_keeps_text() {
        let mut input = typed("queued question");
        input.enabled = false;
        assert!(!input.can_submit());
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "queued question");
    }

    #[test]
    fn test_up_on_first_row_overflows() {
        let mut input = typed("one line");
        assert_eq!(
            input.handle_event(&TuiEvent::CursorUp),
            Some(InputEvent::Overflow(TuiEvent::CursorUp))
        );
    }

    #[test]
    fn test_up_moves_between_rows() {
        let mut input = typed("first\nsecond");
        assert_eq!(
            input.handle_event(&TuiEvent::CursorUp),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "first!\nsecond");
    }

    #[test]
    fn test_height_grows_then_caps() {
        let input = typed("a");
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);

        let input = typed("1\n2\n3");
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);

        let input = typed("1\n2\n3\n4\n5\n6\n7\n8");
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_placeholder_when_empty() {
        let mut input = InputBox::new();
        let text = screen_text(&mut input, 70, 3);
        assert!(text.contains(PLACEHOLDER));
        assert!(text.contains("Ask"));
    }

    #[test]
    fn test_render_disabled_title() {
        let mut input = typed("hello");
        input.enabled = false;
        let text = screen_text(&mut input, 60, 3);
        assert!(text.contains("Waiting for answer"));
        assert!(text.contains("hello"));
        assert!(!text.contains("send"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut input = typed("1\n2\n3\n4\n5\n6\n7");
        let height = input.calculate_height(30);
        let text = screen_text(&mut input, 30, height);
        assert!(text.contains('7'));
        assert!(!text.contains('1'));
    }
}

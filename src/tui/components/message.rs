use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{ChatMessage, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank row below each bubble.
const MESSAGE_GAP: u16 = 1;
/// Bubbles never take more than this share of the row.
const MAX_BUBBLE_PERCENT: u16 = 85;
/// Narrowest user bubble, so the title always fits.
const MIN_BUBBLE_WIDTH: u16 = 10;

const BOT_TITLE: &str = "✦ pilot";
const USER_TITLE: &str = "you";
const BOT_TEXT: Color = Color::Gray;

/// A stateless component that renders one chat bubble.
///
/// Bot bubbles sit on the left and render their body as markdown. User
/// bubbles sit on the right, shrink to their content, and show the text
/// verbatim with whitespace preserved.
///
/// `body` is what is currently on screen. It equals `message.text` except
/// for the newest bot message while the typewriter is still revealing it.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub body: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, body: &'a str) -> Self {
        Self { message, body }
    }

    /// A message shown in full.
    pub fn full(message: &'a ChatMessage) -> Self {
        Self::new(message, &message.text)
    }

    fn body_text(&self) -> Text<'static> {
        match self.message.role {
            Role::Bot => markdown::render(self.body, BOT_TEXT),
            Role::User => Text::raw(self.body.to_owned()),
        }
    }

    fn paragraph(&self) -> Paragraph<'static> {
        let style = match self.message.role {
            Role::Bot => Style::default().fg(BOT_TEXT),
            Role::User => Style::default().fg(Color::White),
        };
        Paragraph::new(self.body_text())
            .style(style)
            .wrap(Wrap { trim: false })
    }

    /// Width of the bubble inside a row of `row_width` columns.
    pub fn bubble_width(&self, row_width: u16) -> u16 {
        let max = (row_width as u32 * MAX_BUBBLE_PERCENT as u32 / 100) as u16;
        match self.message.role {
            Role::Bot => max,
            Role::User => {
                let widest = self
                    .body
                    .lines()
                    .map(|l| l.width())
                    .max()
                    .unwrap_or(0)
                    .min(u16::MAX as usize) as u16;
                widest
                    .saturating_add(HORIZONTAL_OVERHEAD)
                    .clamp(MIN_BUBBLE_WIDTH.min(max), max)
            }
        }
    }

    /// Rows this message occupies in a row of `row_width`, gap included.
    ///
    /// Uses `Paragraph::line_count` so the list can size its scroll canvas
    /// without rendering first.
    pub fn height(&self, row_width: u16) -> u16 {
        let inner = self.bubble_width(row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }
        let lines = self.paragraph().line_count(inner).max(1);
        (lines.min(u16::MAX as usize) as u16)
            .saturating_add(VERTICAL_OVERHEAD)
            .saturating_add(MESSAGE_GAP)
    }

    fn bubble_rect(&self, area: Rect) -> Rect {
        let width = self.bubble_width(area.width);
        let x = match self.message.role {
            Role::Bot => area.x,
            Role::User => area.x + area.width.saturating_sub(width),
        };
        Rect::new(x, area.y, width, area.height.saturating_sub(MESSAGE_GAP))
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let (title, alignment, border_style, title_style) = match self.message.role {
            Role::Bot => (
                BOT_TITLE,
                Alignment::Left,
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Role::User => (
                USER_TITLE,
                Alignment::Right,
                Style::default().fg(Color::Blue),
                Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
            ),
        };

        let bubble = self.bubble_rect(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_alignment(alignment)
            .title_style(title_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(bubble);
        block.render(bubble, buf);
        self.paragraph().render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(message: Message<'_>, width: u16, height: u16) -> Vec<String> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(message, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    // ==========================================================================
    // height tests
    // ==========================================================================

    #[test]
    fn height_single_line_includes_borders_and_gap() {
        let msg = ChatMessage::bot("Hello");
        assert_eq!(
            Message::full(&msg).height(80),
            1 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn height_of_empty_body_keeps_one_line() {
        let msg = ChatMessage::bot("Hello");
        assert_eq!(
            Message::new(&msg, "").height(80),
            1 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn height_zero_width_returns_minimum() {
        let msg = ChatMessage::user("Hello world");
        assert_eq!(Message::full(&msg).height(0), 1);
    }

    #[test]
    fn height_counts_markdown_paragraph_gap() {
        let msg = ChatMessage::bot("One.\n\nTwo.");
        // "One." + blank + "Two."
        assert_eq!(
            Message::full(&msg).height(80),
            3 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn height_wraps_long_bot_text() {
        let msg = ChatMessage::bot("word ".repeat(40).trim_end().to_string());
        let one_line = 1 + VERTICAL_OVERHEAD + MESSAGE_GAP;
        assert!(Message::full(&msg).height(40) > one_line);
    }

    #[test]
    fn user_newlines_are_preserved() {
        let msg = ChatMessage::user("line one\nline two");
        assert_eq!(
            Message::full(&msg).height(80),
            2 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    // ==========================================================================
    // layout tests
    // ==========================================================================

    #[test]
    fn bot_bubble_takes_max_share() {
        let msg = ChatMessage::bot("hi");
        assert_eq!(Message::full(&msg).bubble_width(100), 85);
    }

    #[test]
    fn user_bubble_shrinks_to_content() {
        let msg = ChatMessage::user("hello there");
        assert_eq!(
            Message::full(&msg).bubble_width(100),
            11 + HORIZONTAL_OVERHEAD
        );
    }

    #[test]
    fn user_bubble_has_minimum_width() {
        let msg = ChatMessage::user("?");
        assert_eq!(Message::full(&msg).bubble_width(100), MIN_BUBBLE_WIDTH);
    }

    #[test]
    fn user_bubble_is_right_aligned() {
        let msg = ChatMessage::user("hello");
        let rows = screen(Message::full(&msg), 40, 4);
        assert!(rows[1].trim_end().ends_with('│'), "{rows:?}");
        assert!(rows[1].starts_with("   "), "{rows:?}");
        assert!(rows[1].contains("hello"));
        assert!(rows[0].contains(USER_TITLE));
    }

    #[test]
    fn bot_bubble_is_left_aligned_with_markdown() {
        let msg = ChatMessage::bot("Welcome to **Geostrata AI**.");
        let rows = screen(Message::full(&msg), 60, 4);
        assert!(rows[0].starts_with('╭'), "{rows:?}");
        assert!(rows[0].contains("pilot"));
        assert!(rows[1].contains("Welcome to Geostrata AI."), "{rows:?}");
    }

    #[test]
    fn partial_body_is_rendered() {
        let msg = ChatMessage::bot("Hello world");
        let rows = screen(Message::new(&msg, "Hel"), 40, 4);
        assert!(rows[1].contains("Hel"));
        assert!(!rows[1].contains("Hello"));
    }
}

//! # TitleBar Component
//!
//! One-line header: product name on the left, endpoint and connection status
//! on the right, plus a `↓ New` marker when the newest message is scrolled
//! out of view.
//!
//! Stateless: every field is a prop supplied by the parent each frame.
//!
//! When the terminal is too narrow for both halves, the right half is
//! dropped first and the brand is kept.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

const BRAND: &str = "THE GEOSTRATA";
const TAGLINE: &str = " · INTELLIGENCE PILOT";
const NEW_MARKER: &str = " | ↓ New";

pub struct TitleBar {
    /// Endpoint the client talks to
    pub base_url: String,
    /// Connection status (e.g. "Online: ...", "Offline")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(base_url: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            base_url,
            status_message,
            has_unseen_content,
        }
    }

    /// Right-hand text, e.g. `http://127.0.0.1:8000 | Online: awake | ↓ New`.
    fn right_text(&self) -> String {
        let mut text = self.base_url.clone();
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(NEW_MARKER);
        }
        text
    }

    fn status_style(&self) -> Style {
        if self.status_message.starts_with("Online") {
            Style::default().fg(Color::Green)
        } else if self.status_message == "Offline" {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left_width = BRAND.width() + TAGLINE.width();
        let right = self.right_text();
        let available = area.width as usize;

        let mut spans = vec![
            Span::styled(
                BRAND,
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::styled(TAGLINE, Style::default().fg(Color::DarkGray)),
        ];

        if left_width + 1 + right.width() <= available {
            let pad = available - left_width - right.width();
            spans.push(Span::raw(" ".repeat(pad)));
            spans.push(Span::styled(right, self.status_style()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_string(title_bar: &mut TitleBar, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_shows_brand_and_status() {
        let mut title_bar = TitleBar::new(
            "http://127.0.0.1:8000".to_string(),
            "Online: Geostrata AI is Awake".to_string(),
            false,
        );
        let text = render_to_string(&mut title_bar, 100);

        assert!(text.contains("THE GEOSTRATA"));
        assert!(text.contains("INTELLIGENCE PILOT"));
        assert!(text.contains("http://127.0.0.1:8000"));
        assert!(text.contains("Online: Geostrata AI is Awake"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar = TitleBar::new("http://x".to_string(), "Offline".to_string(), true);
        let text = render_to_string(&mut title_bar, 80);
        assert!(text.contains("Offline"));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_narrow_keeps_brand() {
        let mut title_bar = TitleBar::new(
            "http://a-very-long-endpoint.example.com:8000".to_string(),
            "Connecting...".to_string(),
            false,
        );
        let text = render_to_string(&mut title_bar, 40);
        assert!(text.contains("THE GEOSTRATA"));
        assert!(!text.contains("endpoint"));
    }

    #[test]
    fn test_right_text_without_status() {
        let title_bar = TitleBar::new("http://x".to_string(), String::new(), false);
        assert_eq!(title_bar.right_text(), "http://x");
    }

    #[test]
    fn test_status_colors() {
        let online = TitleBar::new(String::new(), "Online: ok".to_string(), false);
        let offline = TitleBar::new(String::new(), "Offline".to_string(), false);
        assert_eq!(online.status_style().fg, Some(Color::Green));
        assert_eq!(offline.status_style().fg, Some(Color::Red));
    }
}

//! # LoadingIndicator Component
//!
//! Spinner row shown under the transcript while a question is in flight.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const LOADING_LABEL: &str = "Analyzing archives...";

/// Rows reserved for the indicator below the last message.
pub const HEIGHT: u16 = 1;

pub struct LoadingIndicator {
    pub spinner_frame: usize,
}

impl LoadingIndicator {
    pub fn new(spinner_frame: usize) -> Self {
        Self { spinner_frame }
    }

    fn glyph(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}

impl Component for LoadingIndicator {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(self.glyph(), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(
                LOADING_LABEL,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]);
        frame.render_widget(line, area);
    }
}

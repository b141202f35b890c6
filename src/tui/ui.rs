use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

const FOOTER: &str = "Powered by The Geostrata Intelligence";

/// Draw one frame: title bar, transcript, input box, footer.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height), Length(1)]);
    let [title_area, main_area, input_area, footer_area] = layout.areas(frame.area());

    MessageList::new(
        &mut tui.message_list,
        &app.transcript,
        &tui.typewriter,
        app.is_loading,
        spinner_frame,
    )
    .render(frame, main_area);

    // After the list so the unseen marker reflects this frame's scroll
    TitleBar::new(
        app.base_url.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.enabled = !app.is_loading;
    tui.input_box.render(frame, input_area);

    let footer = Paragraph::new(FOOTER)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use crate::tui::components::input_box::PLACEHOLDER;
    use crate::tui::components::loading::LOADING_LABEL;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..24)
            .map(|y| (0..80).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_ui_initial_screen() {
        let app = test_app();
        let mut tui = TuiState::new(std::time::Duration::ZERO);
        let screen = draw(&app, &mut tui);

        assert!(screen.contains("THE GEOSTRATA"));
        assert!(screen.contains("Welcome to Geostrata AI."));
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains(FOOTER));
    }

    #[test]
    fn test_draw_ui_while_loading() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Arctic policy?".to_string()));
        let mut tui = TuiState::new(std::time::Duration::ZERO);
        let screen = draw(&app, &mut tui);

        assert!(screen.contains("Arctic policy?"));
        assert!(screen.contains(LOADING_LABEL));
        assert!(!tui.input_box.enabled);
        assert!(screen.contains("Waiting for answer"));
    }

    #[test]
    fn test_draw_ui_reenables_input_after_answer() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Arctic policy?".to_string()));
        update(&mut app, Action::AnswerReceived("Melting ice.".to_string()));
        let mut tui = TuiState::new(std::time::Duration::ZERO);
        let screen = draw(&app, &mut tui);

        assert!(tui.input_box.enabled);
        assert!(!screen.contains(LOADING_LABEL));
        assert!(screen.contains("Melting ice."));
    }
}

//! # Actions
//!
//! Everything that can happen in Pilot becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The endpoint answers? That's `Action::AnswerReceived(answer)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the caller
//! must perform. No side effects happen here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{info, warn};

use crate::core::state::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The user submitted the input buffer.
    Submit(String),
    /// The endpoint returned an answer.
    AnswerReceived(String),
    /// The request failed. The reason is logged, never displayed.
    RequestFailed(String),
    /// Result of the start-up health probe.
    HealthChecked(Result<String, String>),
    Quit,
}

/// I/O requested by `update()`, performed by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send this question to the chat endpoint.
    SpawnRequest(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() || app.is_loading {
                return Effect::None;
            }
            info!("Submitting question ({} bytes)", text.len());
            app.transcript.push_user(text.clone());
            app.is_loading = true;
            Effect::SpawnRequest(text)
        }
        Action::AnswerReceived(answer) => {
            info!("Answer received ({} bytes)", answer.len());
            app.transcript.push_bot(answer);
            app.is_loading = false;
            Effect::None
        }
        Action::RequestFailed(reason) => {
            warn!("Chat request failed: {}", reason);
            app.transcript.push_bot(app.error_reply.clone());
            app.is_loading = false;
            Effect::None
        }
        Action::HealthChecked(Ok(message)) => {
            app.status_message = format!("Online: {}", message);
            Effect::None
        }
        Action::HealthChecked(Err(reason)) => {
            warn!("Health check failed: {}", reason);
            app.status_message = String::from("Offline");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{ChatMessage, Role};
    use crate::test_support::test_app;

    #[test]
    fn submit_appends_user_message_and_requests() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("What is the Arctic Council?".into()));

        assert_eq!(effect, Effect::SpawnRequest("What is the Arctic Council?".into()));
        assert!(app.is_loading);
        assert_eq!(
            app.transcript.last(),
            Some(&ChatMessage::user("What is the Arctic Council?"))
        );
    }

    #[test]
    fn submit_keeps_text_as_typed() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  padded  ".into()));
        assert_eq!(effect, Effect::SpawnRequest("  padded  ".into()));
        assert_eq!(app.transcript.last().unwrap().text, "  padded  ");
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut app = test_app();
        let before = app.transcript.clone();

        assert_eq!(update(&mut app, Action::Submit("   \n\t".into())), Effect::None);
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);

        assert_eq!(app.transcript, before);
        assert!(!app.is_loading);
    }

    #[test]
    fn submit_while_loading_is_ignored() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".into()));
        let len = app.transcript.len();

        let effect = update(&mut app, Action::Submit("second".into()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), len);
    }

    #[test]
    fn answer_appends_bot_message_and_clears_loading() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q".into()));

        let effect = update(&mut app, Action::AnswerReceived("**a**".into()));

        assert_eq!(effect, Effect::None);
        assert!(!app.is_loading);
        assert_eq!(app.transcript.last(), Some(&ChatMessage::bot("**a**")));
    }

    #[test]
    fn failure_appends_fixed_error_reply() {
        let mut app = test_app();
        update(&mut app, Action::Submit("q".into()));

        update(&mut app, Action::RequestFailed("connection refused".into()));

        assert!(!app.is_loading);
        let last = app.transcript.last().unwrap();
        assert_eq!(last.role, Role::Bot);
        assert_eq!(last.text, app.error_reply);
        assert!(!last.text.contains("connection refused"));
    }

    #[test]
    fn can_submit_again_after_answer() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".into()));
        update(&mut app, Action::AnswerReceived("1".into()));

        let effect = update(&mut app, Action::Submit("two".into()));

        assert_eq!(effect, Effect::SpawnRequest("two".into()));
        let texts: Vec<&str> = app.transcript.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(&texts[1..], &["one", "1", "two"]);
    }

    #[test]
    fn health_check_updates_status_only() {
        let mut app = test_app();
        let len = app.transcript.len();

        update(&mut app, Action::HealthChecked(Ok("Geostrata AI is Awake".into())));
        assert_eq!(app.status_message, "Online: Geostrata AI is Awake");

        update(&mut app, Action::HealthChecked(Err("timeout".into())));
        assert_eq!(app.status_message, "Offline");

        assert_eq!(app.transcript.len(), len);
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}

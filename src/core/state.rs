//! # Application State
//!
//! Core business state for Pilot. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── transcript: Transcript       // ordered chat history
//! ├── is_loading: bool             // a question is in flight
//! ├── status_message: String       // title bar text (backend health)
//! ├── error_reply: String          // bot text shown when a request fails
//! └── base_url: String             // endpoint, shown in the title bar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::{DEFAULT_BASE_URL, DEFAULT_ERROR_MESSAGE, ResolvedConfig};
use crate::core::message::{DEFAULT_WELCOME, Transcript};

pub struct App {
    pub transcript: Transcript,
    pub is_loading: bool,
    pub status_message: String,
    pub error_reply: String,
    pub base_url: String,
}

impl App {
    pub fn new(base_url: String) -> Self {
        Self {
            transcript: Transcript::with_welcome(DEFAULT_WELCOME),
            is_loading: false,
            status_message: String::from("Connecting..."),
            error_reply: DEFAULT_ERROR_MESSAGE.to_string(),
            base_url,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            transcript: Transcript::with_welcome(config.welcome_message.clone()),
            error_reply: config.error_message.clone(),
            ..Self::new(config.base_url.clone())
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

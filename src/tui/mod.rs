//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Typing** (typewriter revealing a message): draws every ~16ms.
//! - **Loading** (spinner only): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
pub mod typewriter;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::ChatClient;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::typewriter::Typewriter;

const TYPING_FRAME: Duration = Duration::from_millis(16);
const SPINNER_FRAME: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub typewriter: Typewriter,
}

impl TuiState {
    pub fn new(typewriter_interval: Duration) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            typewriter: Typewriter::new(typewriter_interval),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets a bare Esc be told apart from escape
        // sequences; terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig, client: Arc<dyn ChatClient>) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(Duration::from_millis(config.typewriter_interval_ms));
    info!(
        "Starting TUI against {} via {} client",
        app.base_url,
        client.name()
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Restore on every exit path, a failed draw included
    let result = event_loop(&mut terminal, &mut app, &mut tui, client);
    if let Err(e) = &result {
        warn!("Event loop failed: {}", e);
    }

    info!("Exiting TUI ({} messages)", app.transcript.len());
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
    client: Arc<dyn ChatClient>,
) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_health_check(client.clone(), tx.clone());

    let start_time = Instant::now();
    let mut last_tick = start_time;
    let mut needs_redraw = true; // Force first frame

    loop {
        let now = Instant::now();
        tui.typewriter.advance(now - last_tick);
        last_tick = now;
        sync_typewriter(app, tui);

        let typing = !tui.typewriter.is_done();
        let animating = typing || app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if typing {
            TYPING_FRAME
        } else if app.is_loading {
            SPINNER_FRAME
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match handle_tui_event(app, tui, &event) {
                Effect::Quit => should_quit = true,
                Effect::SpawnRequest(question) => {
                    spawn_request(client.clone(), question, tx.clone());
                }
                Effect::None => {}
            }
        }

        if should_quit {
            return Ok(());
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if update(app, action) == Effect::Quit {
                should_quit = true;
            }
        }

        if should_quit {
            return Ok(());
        }
    }
}

/// Point the typewriter at the newest message when it is a bot message.
/// A trailing user message (question pending) shows everything in full.
fn sync_typewriter(app: &App, tui: &mut TuiState) {
    match app.transcript.last_bot_index() {
        Some(index) => {
            let text = &app.transcript.messages()[index].text;
            tui.typewriter.sync(index, text);
        }
        None => tui.typewriter.clear(),
    }
}

/// Route one terminal event to the component that owns it, turning
/// submissions into core actions.
fn handle_tui_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    match event {
        TuiEvent::Quit => update(app, Action::Quit),
        // Resize just needs a redraw (already flagged by the caller)
        TuiEvent::Resize => Effect::None,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            Effect::None
        }
        _ => {
            // Several events are drained per frame, so the prop can't wait for the next draw
            tui.input_box.enabled = !app.is_loading;
            handle_input_event(app, tui, event)
        }
    }
}

fn handle_input_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    match tui.input_box.handle_event(event) {
        Some(InputEvent::Submit(text)) => {
            let effect = update(app, Action::Submit(text));
            tui.input_box.enabled = !app.is_loading;
            tui.message_list.jump_to_bottom();
            effect
        }
        // Up/Down past the first/last input row scrolls the transcript
        Some(InputEvent::Overflow(overflow)) => {
            tui.message_list.handle_event(&overflow);
            Effect::None
        }
        Some(InputEvent::ContentChanged) | None => Effect::None,
    }
}

fn spawn_request(
    client: Arc<dyn ChatClient>,
    question: String,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!("Spawning chat request via {}", client.name());
    tokio::spawn(async move {
        let request_start = Instant::now();
        let action = match client.ask(&question).await {
            Ok(answer) => {
                debug!(
                    "Chat request completed in {}ms",
                    request_start.elapsed().as_millis()
                );
                Action::AnswerReceived(answer)
            }
            Err(e) => Action::RequestFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to send chat result: receiver dropped");
        }
    })
}

fn spawn_health_check(
    client: Arc<dyn ChatClient>,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.health().await.map_err(|e| e.to_string());
        if tx.send(Action::HealthChecked(result)).is_err() {
            warn!("Failed to send health result: receiver dropped");
        }
    })
}

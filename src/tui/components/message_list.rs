//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display every message, newest at the bottom
//! - Show the typewriter's partial body for the message being revealed
//! - Show the loading row while a question is pending
//! - Manage scrolling and the stick-to-bottom behavior
//! - Cache message heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//!
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass, in the manner of Ratatui's
//! `StatefulWidget`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Transcript;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::loading::{self, LoadingIndicator};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;
use crate::tui::typewriter::Typewriter;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Canvas height from the last render, loading row included
    pub canvas_height: u16,
    /// Message count and loading flag from the last render; a change re-pins
    seen: (usize, bool),
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            canvas_height: 0,
            seen: (0, false),
        }
    }

    fn max_offset(&self) -> u16 {
        self.canvas_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Jump to the newest message and follow it again.
    pub fn jump_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        let max_y = self.max_offset();
        self.scroll_state.set_offset(Position { x: 0, y: max_y });
    }

    /// True when the user scrolled up and there is content below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub typewriter: &'a Typewriter,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        typewriter: &'a Typewriter,
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            typewriter,
            is_loading,
            spinner_frame,
        }
    }

    /// Message `index` as currently shown: partial while the typewriter owns it.
    fn message(&self, index: usize) -> Message<'a> {
        let transcript: &'a Transcript = self.transcript;
        let typewriter: &'a Typewriter = self.typewriter;
        let msg = &transcript.messages()[index];
        if typewriter.key() == Some(index) {
            Message::new(msg, typewriter.visible())
        } else {
            Message::full(msg)
        }
    }

    /// Index whose height changes from frame to frame, if any.
    fn volatile_index(&self) -> Option<usize> {
        self.typewriter
            .key()
            .filter(|_| !self.typewriter.is_done())
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_messages = self.transcript.len();
        let volatile = self.volatile_index();

        // 1. Update layout cache
        let reusable = self
            .state
            .layout
            .reusable_count(num_messages, content_width, volatile);
        self.state.layout.heights.truncate(reusable);
        for i in self.state.layout.heights.len()..num_messages {
            let height = self.message(i).height(content_width);
            self.state.layout.heights.push(height);
        }
        self.state.layout.rebuild_prefix_heights();
        self.state
            .layout
            .update_metadata(num_messages, content_width, volatile);

        let content_height = self.state.layout.total_height();
        let loading_rows = if self.is_loading { loading::HEIGHT } else { 0 };
        let canvas_height = content_height.saturating_add(loading_rows);

        // 2. Resolve the scroll offset for this frame
        if self.state.seen != (num_messages, self.is_loading) {
            self.state.seen = (num_messages, self.is_loading);
            self.state.stick_to_bottom = true;
        }
        self.state.viewport_height = area.height;
        self.state.canvas_height = canvas_height;
        if self.state.stick_to_bottom {
            self.state.jump_to_bottom();
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = self.state.layout.top_of(visible_range.start);
        for i in visible_range {
            let height = self.state.layout.heights[i];
            scroll_view.render_widget(self.message(i), Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Loading row directly under the last message, when on screen
        if self.is_loading {
            let row = content_height.saturating_sub(scroll_offset);
            if row < area.height {
                let spinner_area = Rect::new(area.x, area.y + row, content_width, loading::HEIGHT);
                LoadingIndicator::new(self.spinner_frame).render(frame, spinner_area);
            }
        }
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because `MessageList` is recreated each frame and can't hold scroll state.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.jump_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    /// Message whose height was measured from a partial body last frame.
    volatile_index: Option<usize>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            volatile_index: None,
        }
    }

    /// Number of leading cached heights that are still valid.
    ///
    /// A message being revealed is remeasured every frame, and once more on
    /// the frame after the reveal finishes so its final height replaces the
    /// partial one.
    pub fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        volatile: Option<usize>,
    ) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }

        let mut count = self.heights.len().min(message_count);
        for index in [volatile, self.volatile_index].into_iter().flatten() {
            count = count.min(index);
        }
        count
    }

    pub fn update_metadata(
        &mut self,
        message_count: usize,
        content_width: u16,
        volatile: Option<usize>,
    ) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.volatile_index = volatile;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas y of the top edge of message `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        match index.checked_sub(1) {
            Some(prev) => self.prefix_heights.get(prev).copied().unwrap_or(0),
            None => 0,
        }
    }

    /// Messages intersecting the viewport, padded by half a screen either side.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: brand, endpoint and connection status
//! - `Message`: one chat bubble
//! - `LoadingIndicator`: spinner row while a question is pending
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: question editor with placeholder and submit guard
//! - `MessageList`: scrollable transcript with layout caching
//!
//! Each component file holds its state types, event types, rendering,
//! event handling and tests. Data flows in as props; nothing reads `App`
//! directly.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── loading.rs       (Spinner row)
//! └── input_box/       (Question editor)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod loading;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};

pub mod client;
pub mod types;

pub use client::{ChatClient, HttpChatClient};
pub use types::{ChatRequest, ChatResponse, ClientError, ErrorBody, HealthResponse, Timeouts};

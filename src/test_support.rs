//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;

use crate::api::{ChatClient, ClientError};

/// A client that answers every question with a fixed string, without I/O.
pub struct StaticClient {
    pub answer: Option<String>,
}

impl StaticClient {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { answer: None }
    }
}

#[async_trait]
impl ChatClient for StaticClient {
    fn name(&self) -> &str {
        "static"
    }

    async fn ask(&self, _question: &str) -> Result<String, ClientError> {
        self.answer
            .clone()
            .ok_or_else(|| ClientError::Network("static failure".to_string()))
    }

    async fn health(&self) -> Result<String, ClientError> {
        Ok("static".to_string())
    }
}

/// Creates a test App with default messages.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new("http://test.invalid".to_string())
}

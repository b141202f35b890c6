//! HTTP client for the question/answer endpoint.
//!
//! The endpoint is a black box with two routes:
//!
//! ```text
//! POST {base_url}/chat   {"question": "..."}  →  {"answer": "..."}
//! GET  {base_url}/                            →  {"message": "..."}
//! ```
//!
//! One request per question. No retries, no cancellation, no auth.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{ChatRequest, ChatResponse, ClientError, ErrorBody, HealthResponse, Timeouts};

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the name of the client, for logs.
    fn name(&self) -> &str;

    /// Sends one question and returns the complete answer text.
    async fn ask(&self, question: &str) -> Result<String, ClientError>;

    /// Probes the endpoint root and returns its greeting.
    async fn health(&self) -> Result<String, ClientError>;
}

/// `ChatClient` over plain HTTP+JSON.
pub struct HttpChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turns a non-success response into `ClientError::Api`, preferring the
/// backend's `detail` field over the raw body.
async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message())
        .unwrap_or(body);
    warn!("Chat API error: {} - {}", status, message);
    ClientError::Api { status, message }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let url = self.endpoint("chat");
        info!("POST {} (question_len={})", url, question.len());

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                question: question.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;

        info!("Answer received: {} bytes", parsed.answer.len());
        Ok(parsed.answer)
    }

    async fn health(&self) -> Result<String, ClientError> {
        let url = self.endpoint("/");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let parsed: HealthResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(parsed.message)
    }
}

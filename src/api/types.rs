use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub question: String,
}

/// Successful reply from `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub answer: String,
}

/// Reply from `GET /`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub message: String,
}

/// Error body in the `{"detail": ...}` shape the backend uses for HTTP 500.
/// `detail` may be a string or a structured validation list.
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human readable detail: strings verbatim, anything else as compact JSON.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Connect and total request timeouts for the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect_secs: u64,
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: crate::core::config::DEFAULT_CONNECT_TIMEOUT_SECS,
            request_secs: crate::core::config::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Errors that can occur talking to the chat endpoint.
/// None of them are retried; the UI shows one fixed message for all.
#[derive(Debug)]
pub enum ClientError {
    /// Client could not be built (bad TLS setup, invalid URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The endpoint returned a non-success status.
    Api { status: u16, message: String },
    /// The body did not match the expected JSON shape.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Config(msg) => write!(f, "config error: {msg}"),
            ClientError::Network(msg) => write!(f, "network error: {msg}"),
            ClientError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ClientError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_serializes_question_field() {
        let body = serde_json::to_value(ChatRequest {
            question: "Arctic?".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"question": "Arctic?"}));
    }

    #[test]
    fn chat_response_ignores_extra_fields() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"answer":"Yes","sources":[]}"#).unwrap();
        assert_eq!(resp.answer, "Yes");
    }

    #[test]
    fn chat_response_requires_answer() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"result":"x"}"#).is_err());
    }

    #[test]
    fn error_body_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"boom"}"#).unwrap();
        assert_eq!(body.message(), "boom");
    }

    #[test]
    fn error_body_structured_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"msg":"field required"}]}"#).unwrap();
        assert_eq!(body.message(), r#"[{"msg":"field required"}]"#);
    }

    #[test]
    fn client_error_display() {
        let err = ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
        assert_eq!(
            ClientError::Network("refused".into()).to_string(),
            "network error: refused"
        );
    }
}

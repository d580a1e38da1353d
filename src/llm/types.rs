//! LLM Gateway Types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Request timeout for a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Gateway configuration, fixed for the lifetime of a client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Model identifier (e.g., "deepseek-r1:8b")
    pub model: String,
    /// Transport timeout for the whole exchange
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "deepseek-r1:8b".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Body of `POST /api/generate`
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Successful `/api/generate` payload; only `response` is used
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// LLM gateway errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The model server could not be reached (refused, timed out, DNS, ...)
    #[error("Could not reach the model server")]
    Connection(#[source] reqwest::Error),

    /// The model server answered with a non-success status
    #[error("Model server rejected the request with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The model server answered with something other than the expected JSON
    #[error("Model server returned an unreadable response: {0}")]
    Protocol(String),

    /// The HTTP client itself could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl LlmError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. } | Self::Protocol(_) => StatusCode::BAD_GATEWAY,
            Self::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            model: "deepseek-r1:8b",
            prompt: "Hi",
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "model": "deepseek-r1:8b", "prompt": "Hi", "stream": false })
        );
    }

    #[test]
    fn test_missing_response_field_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(parsed.response, "");
    }

    #[test]
    fn test_error_messages_do_not_leak_prompt() {
        let err = LlmError::Upstream {
            status: 500,
            body: "model not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model server rejected the request with status 500: model not found"
        );
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }
}

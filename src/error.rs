//! Error types for the CV Match server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::job::FetchError;
use crate::llm::LlmError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Error response body.
///
/// `detail` is the key the web client reads for the message.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, detail) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Multipart(e) => (e.status(), "bad_upload", e.body_text()),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {}", e);
                let (error_type, detail) = match e {
                    LlmError::Connection(_) => {
                        ("llm_unreachable", "Could not reach the model server".to_string())
                    }
                    LlmError::Upstream { status, .. } => (
                        "llm_rejected",
                        format!("The model server rejected the request (status {})", status),
                    ),
                    LlmError::Protocol(_) => (
                        "llm_protocol",
                        "The model server returned an unreadable response".to_string(),
                    ),
                    LlmError::ClientBuild(_) => {
                        ("internal_error", "An internal error occurred".to_string())
                    }
                };
                (e.status_code(), error_type, detail)
            }
            AppError::Extract(e) => {
                tracing::warn!("Extraction error: {}", e);
                let (error_type, detail) = match e {
                    ExtractError::UnsupportedFormat(_) => ("unsupported_format", e.to_string()),
                    ExtractError::Decode(_) | ExtractError::Pdf(_) | ExtractError::Docx(_) => (
                        "unreadable_document",
                        format!("Could not understand the uploaded file: {}", e),
                    ),
                    ExtractError::Ocr(_) => ("ocr_failed", e.to_string()),
                    ExtractError::Task(_) => {
                        ("internal_error", "An internal error occurred".to_string())
                    }
                };
                (e.status_code(), error_type, detail)
            }
            AppError::Fetch(e) => {
                tracing::warn!("Fetch error: {}", e);
                (e.status_code(), "fetch_failed", e.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            detail,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_status() {
        let response =
            AppError::from(ExtractError::UnsupportedFormat("application/json".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_upstream_status() {
        let response = AppError::from(LlmError::Upstream {
            status: 500,
            body: "boom".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("missing cv_file".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

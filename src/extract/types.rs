//! Extraction types and errors

use thiserror::Error;

use crate::ocr::OcrError;

/// MIME types with a dedicated extraction strategy
pub mod mime {
    pub const PDF: &str = "application/pdf";
    pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
    /// Legacy binary Word; recognized only to be rejected explicitly
    pub const MSWORD: &str = "application/msword";
    pub const TEXT_PREFIX: &str = "text/";
}

/// Reduce a declared content type to its lowercase `type/subtype` essence.
///
/// `"Text/Plain; charset=UTF-8"` becomes `"text/plain"`.
pub fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Document extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No strategy is registered for the MIME type
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Plain-text upload is not valid UTF-8
    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// PDF could not be opened or rendered
    #[error("Could not read PDF: {0}")]
    Pdf(String),

    /// DOCX container or document.xml is unreadable
    #[error("Could not read DOCX: {0}")]
    Docx(String),

    /// OCR fallback failed
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    /// Blocking worker panicked or was cancelled
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl ExtractError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Decode(_) | Self::Pdf(_) | Self::Docx(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Ocr(e) => e.status_code(),
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mupdf::Error> for ExtractError {
    fn from(err: mupdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        ExtractError::Docx(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("application/pdf"), "application/pdf");
        assert_eq!(normalize_mime("Text/Plain; charset=UTF-8"), "text/plain");
        assert_eq!(normalize_mime("  application/PDF  "), "application/pdf");
        assert_eq!(normalize_mime(""), "");
    }

    #[test]
    fn test_status_codes() {
        use axum::http::StatusCode;

        assert_eq!(
            ExtractError::UnsupportedFormat("application/json".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ExtractError::Docx("bad zip".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ExtractError::Ocr(OcrError::ProviderNotAvailable("none".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}

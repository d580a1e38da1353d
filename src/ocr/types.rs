//! OCR Types

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrProvider {
    /// Tesseract OCR (local CLI)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::Tesseract
    }
}

/// Recognition result for a single page image
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Recognized text fragments in reading order
    pub fragments: Vec<String>,
    /// Provider used
    pub provider: OcrProvider,
}

impl OcrResult {
    /// Fragments joined with a single space
    pub fn page_text(&self) -> String {
        self.fragments.join(" ")
    }
}

/// Split raw engine output into non-empty trimmed lines
pub(crate) fn fragments_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::ProviderNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_skip_blank_lines() {
        let fragments = fragments_from_text("  Curriculum Vitae \n\n\nJane  Doe\n   \n");
        assert_eq!(fragments, vec!["Curriculum Vitae", "Jane  Doe"]);
    }

    #[test]
    fn test_page_text_joins_with_space() {
        let result = OcrResult {
            fragments: vec!["Име".to_string(), "Презиме".to_string()],
            provider: OcrProvider::Tesseract,
        };
        assert_eq!(result.page_text(), "Име Презиме");
    }

    #[test]
    fn test_empty_page_text() {
        let result = OcrResult {
            fragments: Vec::new(),
            provider: OcrProvider::Tesseract,
        };
        assert_eq!(result.page_text(), "");
    }
}

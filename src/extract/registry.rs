//! Extractor registry
//!
//! Maps a declared MIME type to the strategy that turns file bytes into text.
//! New formats are added by registering another `FormatExtractor`.

use std::sync::Arc;

use async_trait::async_trait;

use super::docx::DocxExtractor;
use super::pdf::PdfExtractor;
use super::text::PlainTextExtractor;
use super::types::{mime, normalize_mime, ExtractError};
use crate::ocr::OcrService;

/// A single format-specific extraction strategy
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this strategy handles the (normalized) MIME type
    fn accepts(&self, mime_type: &str) -> bool;

    /// Extract text, taking ownership of the bytes for the duration of the call
    async fn extract(&self, data: Vec<u8>) -> Result<String, ExtractError>;
}

/// Ordered registry of extraction strategies; first match wins
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with PDF (OCR fallback), DOCX and plain-text strategies
    pub fn with_defaults(ocr: Arc<OcrService>) -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new(ocr));
        registry.register(DocxExtractor);
        registry.register(PlainTextExtractor);
        registry
    }

    /// Append a strategy
    pub fn register<E: FormatExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.push(Arc::new(extractor));
    }

    /// Find the strategy for a MIME type
    pub fn get_for_mime(&self, mime_type: &str) -> Option<Arc<dyn FormatExtractor>> {
        let essence = normalize_mime(mime_type);
        self.extractors
            .iter()
            .find(|extractor| extractor.accepts(&essence))
            .cloned()
    }

    /// Extract text from uploaded bytes.
    ///
    /// Unknown MIME types fail with `UnsupportedFormat` before any parsing.
    pub async fn extract(&self, data: Vec<u8>, mime_type: &str) -> Result<String, ExtractError> {
        let Some(extractor) = self.get_for_mime(mime_type) else {
            if normalize_mime(mime_type) == mime::MSWORD {
                tracing::warn!("Rejecting legacy .doc upload; only .docx is supported");
            } else {
                tracing::warn!("Rejecting upload with unsupported type {}", mime_type);
            }
            return Err(ExtractError::UnsupportedFormat(mime_type.to_string()));
        };

        tracing::info!(
            "Extracting text from {} bytes with the {} extractor",
            data.len(),
            extractor.name()
        );

        let text = extractor.extract(data).await?;
        tracing::debug!("Extracted {} characters", text.chars().count());
        Ok(text)
    }
}

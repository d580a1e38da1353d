//! OCR Service
//!
//! Orchestrates OCR providers and assembles page-ordered text.

use std::sync::Arc;

use super::{
    provider::{OcrProviderTrait, OllamaProvider, TesseractProvider},
    types::{OcrError, OcrProvider, OcrResult},
};

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Preferred provider order
    pub providers: Vec<OcrProvider>,
    /// Tesseract language spec (e.g., "eng+mkd")
    pub languages: String,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama vision model name
    pub ollama_model: String,
    /// Scale applied when rendering PDF pages for recognition
    pub render_scale: f32,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            providers: vec![OcrProvider::Tesseract],
            languages: "eng+mkd".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
            render_scale: 2.0,
        }
    }
}

/// OCR service for scanned document pages
pub struct OcrService {
    config: OcrServiceConfig,
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a new OCR service with the providers named in the config
    pub fn new(config: OcrServiceConfig) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|provider| -> Arc<dyn OcrProviderTrait> {
                match provider {
                    OcrProvider::Tesseract => Arc::new(TesseractProvider::new()),
                    OcrProvider::Ollama => {
                        Arc::new(OllamaProvider::new(&config.ollama_url, &config.ollama_model))
                    }
                }
            })
            .collect();

        Self { config, providers }
    }

    /// Create a service over an explicit provider list
    pub fn with_providers(
        config: OcrServiceConfig,
        providers: Vec<Arc<dyn OcrProviderTrait>>,
    ) -> Self {
        Self { config, providers }
    }

    pub fn config(&self) -> &OcrServiceConfig {
        &self.config
    }

    /// Recognize one page image with the first provider that succeeds
    pub async fn recognize(&self, image_data: &[u8]) -> Result<OcrResult, OcrError> {
        let mut last_error = None;

        for provider in &self.providers {
            if !provider.is_available().await {
                tracing::debug!("OCR provider {:?} is not available", provider.provider_type());
                continue;
            }

            match provider.recognize(image_data, &self.config.languages).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(
                        "OCR provider {:?} failed: {}, trying next",
                        provider.provider_type(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            OcrError::ProviderNotAvailable("No OCR providers available".to_string())
        }))
    }

    /// Recognize rendered pages in order.
    ///
    /// Each page contributes its fragments joined by a space plus a trailing
    /// newline, so blank pages show up as empty lines.
    pub async fn recognize_pages(&self, pages: &[Vec<u8>]) -> Result<String, OcrError> {
        let mut text = String::new();

        for (index, page) in pages.iter().enumerate() {
            let result = self.recognize(page).await?;
            tracing::debug!(
                "OCR page {} via {:?}: {} fragments",
                index + 1,
                result.provider,
                result.fragments.len()
            );
            text.push_str(&result.page_text());
            text.push('\n');
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::provider::MockProvider;

    #[test]
    fn test_ocr_service_creation() {
        let config = OcrServiceConfig {
            providers: vec![OcrProvider::Tesseract, OcrProvider::Ollama],
            ..OcrServiceConfig::default()
        };
        let service = OcrService::new(config);

        assert_eq!(service.providers.len(), 2);
    }

    #[tokio::test]
    async fn test_recognize_pages_joins_in_order() {
        let mock = Arc::new(MockProvider::returning(&["Line one", "line two"]));
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![mock.clone() as Arc<dyn OcrProviderTrait>],
        );

        let text = service
            .recognize_pages(&[b"page-1".to_vec(), b"page-2".to_vec()])
            .await
            .unwrap();

        assert_eq!(text, "Line one line two\nLine one line two\n");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_blank_pages_yield_newlines() {
        let mock = Arc::new(MockProvider::returning(&[]));
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![mock as Arc<dyn OcrProviderTrait>],
        );

        let text = service.recognize_pages(&[b"blank".to_vec()]).await.unwrap();
        assert_eq!(text, "\n");
    }

    #[tokio::test]
    async fn test_no_available_provider() {
        let mut unavailable = MockProvider::returning(&["never"]);
        unavailable.available = false;
        let unavailable = Arc::new(unavailable);
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![unavailable.clone() as Arc<dyn OcrProviderTrait>],
        );

        let result = service.recognize(b"image").await;

        assert!(matches!(result, Err(OcrError::ProviderNotAvailable(_))));
        assert_eq!(unavailable.call_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_provider() {
        let mut unavailable = MockProvider::returning(&["first"]);
        unavailable.available = false;
        let fallback = Arc::new(MockProvider::returning(&["second"]));
        let service = OcrService::with_providers(
            OcrServiceConfig::default(),
            vec![Arc::new(unavailable) as Arc<dyn OcrProviderTrait>, fallback.clone()],
        );

        let result = service.recognize(b"image").await.unwrap();
        assert_eq!(result.fragments, vec!["second"]);
        assert_eq!(fallback.call_count(), 1);
    }
}

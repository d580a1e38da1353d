//! OCR Providers
//!
//! Defines the provider trait and implementations for different OCR backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::llm::GenerateResponse;
use super::types::{fragments_from_text, OcrError, OcrProvider, OcrResult};

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an encoded page image (PNG)
    async fn recognize(&self, image_data: &[u8], languages: &str) -> Result<OcrResult, OcrError>;
}

/// Tesseract OCR provider
///
/// Runs the `tesseract` binary once per image, so no engine state outlives
/// a single page.
pub struct TesseractProvider {
    binary: String,
}

impl TesseractProvider {
    pub fn new() -> Self {
        Self::with_binary("tesseract")
    }

    pub fn with_binary(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

impl Default for TesseractProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8], languages: &str) -> Result<OcrResult, OcrError> {
        let input_path =
            std::env::temp_dir().join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));

        tokio::fs::write(&input_path, image_data)
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        // "stdout" as output base makes tesseract print the text instead of writing a file
        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(languages)
            .arg("--psm")
            .arg("3")
            .output()
            .await;

        let _ = tokio::fs::remove_file(&input_path).await;

        let output = output
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);

        Ok(OcrResult {
            fragments: fragments_from_text(&text),
            provider: OcrProvider::Tesseract,
        })
    }
}

/// OCR through an Ollama vision model (`llava` by default)
///
/// The page image travels base64-encoded in the `images` field of
/// `/api/generate`; the transcription comes back in `response`.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// `llava` matches both `llava` and `llava:latest` in the tag list
    fn is_installed(&self, tags: &TagList) -> bool {
        tags.models.iter().any(|installed| {
            installed.name == self.model
                || installed
                    .name
                    .strip_prefix(self.model.as_str())
                    .is_some_and(|tag| tag.starts_with(':'))
        })
    }
}

#[derive(Serialize)]
struct VisionRequest<'a> {
    model: &'a str,
    prompt: String,
    images: [String; 1],
    stream: bool,
}

#[derive(Deserialize)]
struct TagList {
    #[serde(default)]
    models: Vec<InstalledModel>,
}

#[derive(Deserialize)]
struct InstalledModel {
    name: String,
}

/// Tesseract codes are what operators configure; the vision prompt wants names
fn language_names(languages: &str) -> Vec<&str> {
    languages
        .split('+')
        .map(|code| match code {
            "eng" => "English",
            "mkd" => "Macedonian",
            other => other,
        })
        .collect()
}

fn transcription_prompt(languages: &str) -> String {
    format!(
        "This is a scanned page of a CV written in {}. Transcribe it line by line, \
         keeping the original spelling and alphabet. Reply with the transcription only.",
        language_names(languages).join(" and/or ")
    )
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    /// Server reachable and the vision model pulled
    async fn is_available(&self) -> bool {
        let response = match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("Ollama tag list returned {}", response.status());
                return false;
            }
            Err(e) => {
                tracing::debug!("Ollama not reachable for OCR: {}", e);
                return false;
            }
        };

        match response.json::<TagList>().await {
            Ok(tags) if self.is_installed(&tags) => true,
            Ok(_) => {
                tracing::warn!("Vision model {} is not installed in Ollama", self.model);
                false
            }
            Err(e) => {
                tracing::debug!("Unreadable Ollama tag list: {}", e);
                false
            }
        }
    }

    async fn recognize(&self, image_data: &[u8], languages: &str) -> Result<OcrResult, OcrError> {
        use base64::Engine;

        let request = VisionRequest {
            model: &self.model,
            prompt: transcription_prompt(languages),
            images: [base64::engine::general_purpose::STANDARD.encode(image_data)],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("vision model unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "vision model {} answered {}: {}",
                self.model,
                status.as_u16(),
                detail.trim()
            )));
        }

        let transcription: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("unreadable transcription: {}", e)))?;

        Ok(OcrResult {
            fragments: fragments_from_text(&transcription.response),
            provider: OcrProvider::Ollama,
        })
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub fragments: Vec<String>,
    pub available: bool,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn returning(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            available: true,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8], _languages: &str) -> Result<OcrResult, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(OcrResult {
            fragments: self.fragments.clone(),
            provider: OcrProvider::Tesseract,
        })
    }
}

//! OCR Module
//!
//! Provides OCR (Optical Character Recognition) for scanned PDF pages.
//!
//! Supports multiple backends:
//! - Tesseract (local CLI, requires installation with the `eng` and `mkd` language packs)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cv_match_server::ocr::{OcrService, OcrServiceConfig};
//!
//! let service = OcrService::new(OcrServiceConfig::default());
//! let text = service.recognize_pages(&rendered_pngs).await?;
//! ```

mod provider;
mod service;
mod types;

#[cfg(test)]
pub(crate) use provider::MockProvider;
pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{OcrError, OcrProvider, OcrResult};

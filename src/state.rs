//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::ExtractorRegistry;
use crate::job::{FetchError, JobFetcher};
use crate::llm::{LlmClient, LlmError, OllamaClient};
use crate::ocr::OcrService;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize LLM client: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to initialize job fetcher: {0}")]
    Fetcher(#[from] FetchError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    llm: Arc<dyn LlmClient>,
    extractor: ExtractorRegistry,
    fetcher: JobFetcher,
}

impl AppState {
    /// Create the state with the Ollama client and default extractors
    pub fn new(config: Config) -> Result<Self, StateError> {
        let llm = Arc::new(OllamaClient::new(config.llm.clone())?);
        let ocr = Arc::new(OcrService::new(config.ocr.clone()));
        let extractor = ExtractorRegistry::with_defaults(ocr);

        Self::from_parts(config, llm, extractor)
    }

    /// Create the state from explicit components
    pub fn from_parts(
        config: Config,
        llm: Arc<dyn LlmClient>,
        extractor: ExtractorRegistry,
    ) -> Result<Self, StateError> {
        let fetcher = JobFetcher::new(config.fetch.timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                llm,
                extractor,
                fetcher,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the LLM gateway
    pub fn llm(&self) -> &dyn LlmClient {
        self.inner.llm.as_ref()
    }

    /// Get the document extractor
    pub fn extractor(&self) -> &ExtractorRegistry {
        &self.inner.extractor
    }

    /// Get the job page fetcher
    pub fn fetcher(&self) -> &JobFetcher {
        &self.inner.fetcher
    }
}

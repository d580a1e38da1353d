//! Ollama client
//!
//! Single-attempt, non-streaming calls to `/api/generate`.

use async_trait::async_trait;

use super::types::{GenerateRequest, GenerateResponse, LlmConfig, LlmError};

/// Text generation backend
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a prompt and return the trimmed model output.
    ///
    /// An empty string is a valid result meaning the model produced nothing.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Client for an Ollama server
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    config: LlmConfig,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        let endpoint = format!("{}/api/generate", config.base_url.trim_end_matches('/'));

        tracing::info!("Initialized Ollama client");
        tracing::info!("Ollama base URL: {}", config.base_url);
        tracing::info!("Ollama model   : {}", config.model);

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// Full URL of the generate endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        tracing::info!("Sending request to Ollama");
        tracing::debug!("Endpoint: {}", self.endpoint);
        tracing::debug!("Model: {}", self.config.model);

        // .json() sets Content-Type: application/json
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to Ollama at {}: {}", self.endpoint, e);
                LlmError::Connection(e)
            })?;

        let status = response.status();
        tracing::info!("Ollama response status: {}", status);

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Ollama response body: {}", e);
            LlmError::Connection(e)
        })?;

        if !status.is_success() {
            tracing::error!("Ollama error response: {}", body);
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Ollama returned malformed JSON: {}", e);
            LlmError::Protocol(e.to_string())
        })?;

        let output = parsed.response.trim().to_string();
        if output.is_empty() {
            tracing::warn!("Ollama returned an empty response");
        }

        Ok(output)
    }
}

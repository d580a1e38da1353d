//! LLM Gateway
//!
//! Forwards prompts to a locally hosted Ollama-compatible server and returns
//! the generated text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cv_match_server::llm::{LlmClient, LlmConfig, OllamaClient};
//!
//! let client = OllamaClient::new(LlmConfig::default())?;
//! let answer = client.generate("Summarize this CV").await?;
//! ```

mod client;
mod types;

pub use client::{LlmClient, OllamaClient};
pub use types::{GenerateRequest, GenerateResponse, LlmConfig, LlmError, DEFAULT_TIMEOUT};

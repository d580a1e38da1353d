//! Configuration management for the CV Match server

use std::env;
use std::time::Duration;

use crate::llm::LlmConfig;
use crate::ocr::{OcrProvider, OcrServiceConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub ocr: OcrServiceConfig,
    pub upload: UploadConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum accepted request body for multipart uploads
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for downloading job announcement pages
    pub timeout: Duration,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            llm: LlmConfig::default(),
            ocr: OcrServiceConfig::default(),
            upload: UploadConfig {
                max_bytes: 20 * 1024 * 1024,
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(30),
            },
        }
    }
}

impl Config {
    /// Build configuration from process environment. Unset variables take
    /// their defaults; a set but invalid variable is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let ocr_defaults = defaults.ocr;
        let providers = match lookup("OCR_PROVIDERS") {
            Some(raw) => parse_providers(&raw)?,
            None => ocr_defaults.providers,
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", &lookup, defaults.server.port)?,
            },
            llm: LlmConfig {
                base_url: lookup("OLLAMA_BASE_URL").unwrap_or(defaults.llm.base_url),
                model: lookup("LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout: defaults.llm.timeout,
            },
            ocr: OcrServiceConfig {
                providers,
                languages: lookup("OCR_LANGUAGES").unwrap_or(ocr_defaults.languages),
                ollama_url: lookup("OLLAMA_BASE_URL").unwrap_or(ocr_defaults.ollama_url),
                ollama_model: lookup("OCR_VISION_MODEL").unwrap_or(ocr_defaults.ollama_model),
                render_scale: parse_render_scale(&lookup, ocr_defaults.render_scale)?,
            },
            upload: UploadConfig {
                max_bytes: parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.upload.max_bytes)?,
            },
            fetch: FetchConfig {
                timeout: Duration::from_secs(parse_or(
                    "FETCH_TIMEOUT_SECS",
                    &lookup,
                    defaults.fetch.timeout.as_secs(),
                )?),
            },
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// Page render scale must be a finite, positive factor
fn parse_render_scale<F>(lookup: &F, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let scale = parse_or("OCR_RENDER_SCALE", lookup, default)?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ConfigError::InvalidValue {
            key: "OCR_RENDER_SCALE",
            value: lookup("OCR_RENDER_SCALE").unwrap_or_default(),
        })
    }
}

fn parse_providers(raw: &str) -> Result<Vec<OcrProvider>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "tesseract" => Ok(OcrProvider::Tesseract),
            "ollama" => Ok(OcrProvider::Ollama),
            _ => Err(ConfigError::InvalidValue {
                key: "OCR_PROVIDERS",
                value: raw.to_string(),
            }),
        })
        .collect()
}

//! Plain text extractor

use async_trait::async_trait;

use super::registry::FormatExtractor;
use super::types::{mime, ExtractError};

/// Strict UTF-8 decoding for any `text/*` upload
pub struct PlainTextExtractor;

#[async_trait]
impl FormatExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn accepts(&self, mime_type: &str) -> bool {
        mime_type.starts_with(mime::TEXT_PREFIX)
    }

    async fn extract(&self, data: Vec<u8>) -> Result<String, ExtractError> {
        Ok(String::from_utf8(data)?)
    }
}

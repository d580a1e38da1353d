//! Job announcement fetcher
//!
//! Downloads a job posting page and converts it to plain text. Single
//! attempt, bounded by the configured timeout.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::html::{html_to_text, HtmlError};

/// Errors while fetching a job announcement
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch job page: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Job page returned status {0}")]
    Status(u16),

    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedContent(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ClientBuild(_) | Self::Html(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Request(_) | Self::Status(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// HTTP fetcher for job announcement pages
pub struct JobFetcher {
    client: reqwest::Client,
}

impl JobFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cv-match-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch `url` and return its readable text
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let url = parse_job_url(url)?;
        tracing::info!("Fetching job announcement from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Job page {} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(crate::extract::normalize_mime)
            .unwrap_or_else(|| "text/html".to_string());

        let body = response.text().await.map_err(FetchError::Request)?;

        let text = match content_type.as_str() {
            "text/html" | "application/xhtml+xml" => html_to_text(&body)?,
            other if other.starts_with("text/") => body.trim().to_string(),
            other => return Err(FetchError::UnsupportedContent(other.to_string())),
        };

        tracing::debug!("Job page yielded {} characters", text.len());
        Ok(text)
    }
}

fn parse_job_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> JobFetcher {
        JobFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(matches!(
            parse_job_url("file:///etc/passwd"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(parse_job_url("not a url"), Err(FetchError::InvalidUrl(_))));
        assert!(parse_job_url(" https://jobs.example.com/123 ").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jobs/42"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    "<html><body><h1>Data Engineer</h1><p>Remote &amp; hybrid</p></body></html>",
                    "text/html; charset=utf-8",
                ),
            )
            .mount(&mock_server)
            .await;

        let text = fetcher()
            .fetch_text(&format!("{}/jobs/42", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(text, "Data Engineer\nRemote & hybrid");
    }

    #[tokio::test]
    async fn test_fetch_plain_text_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("  Junior QA position \n"),
            )
            .mount(&mock_server)
            .await;

        let text = fetcher().fetch_text(&mock_server.uri()).await.unwrap();
        assert_eq!(text, "Junior QA position");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = fetcher().fetch_text(&mock_server.uri()).await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_fetch_binary_content_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
            )
            .mount(&mock_server)
            .await;

        let result = fetcher().fetch_text(&mock_server.uri()).await;
        assert!(matches!(result, Err(FetchError::UnsupportedContent(_))));
    }
}

//! CV analysis endpoints
//!
//! - POST /analyze - match an uploaded CV against job announcement text
//! - POST /fetch-job - download a job announcement and return its text

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::extract::Upload;
use crate::error::{AppError, Result};
use crate::job::build_analysis_prompt;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub message: String,
}

/// Analyze a CV (`cv_file`) against a job announcement (`job_content`)
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>> {
    let mut cv_file = None;
    let mut job_content = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("cv_file") => cv_file = Some(Upload::from_field(field).await?),
            Some("job_content") => job_content = Some(field.text().await?),
            _ => {}
        }
    }

    let (Some(cv_file), Some(job_content)) = (cv_file, job_content) else {
        return Err(AppError::BadRequest(
            "Both CV file and job content are required".to_string(),
        ));
    };

    if job_content.trim().is_empty() {
        return Err(AppError::BadRequest("Job content must not be empty".to_string()));
    }

    let cv_text = state
        .extractor()
        .extract(cv_file.data, &cv_file.mime_type)
        .await?;

    if cv_text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "No text could be extracted from the CV".to_string(),
        ));
    }

    tracing::info!(
        "Analyzing CV {:?} ({} characters) against job announcement ({} characters)",
        cv_file.file_name,
        cv_text.chars().count(),
        job_content.chars().count()
    );

    let prompt = build_analysis_prompt(&cv_text, &job_content);
    let message = state.llm().generate(&prompt).await?;

    Ok(Json(AnalyzeResponse { message }))
}

#[derive(Debug, Deserialize)]
pub struct FetchJobRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct FetchJobResponse {
    pub content: String,
}

/// Fetch a job announcement page as plain text
pub async fn fetch_job(
    State(state): State<AppState>,
    Json(request): Json<FetchJobRequest>,
) -> Result<Json<FetchJobResponse>> {
    if request.url.trim().is_empty() {
        return Err(AppError::BadRequest("URL is required".to_string()));
    }

    let content = state.fetcher().fetch_text(&request.url).await?;
    Ok(Json(FetchJobResponse { content }))
}

//! Direct prompt endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResult {
    pub response: String,
}

/// Forward a prompt to the LLM gateway
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResult>> {
    if body.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".to_string()));
    }

    let response = state.llm().generate(&body.prompt).await?;
    Ok(Json(GenerateResult { response }))
}

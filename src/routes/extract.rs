//! Document upload and text extraction endpoint

use axum::extract::multipart::Field;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// A file received through multipart upload
pub struct Upload {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Upload {
    /// Read a multipart file field into memory
    pub async fn from_field(field: Field<'_>) -> Result<Self> {
        let file_name = field.file_name().map(str::to_string);
        let mime_type = resolve_mime(field.content_type(), file_name.as_deref());
        let data = field.bytes().await?.to_vec();

        tracing::debug!(
            "Received upload {:?} ({}, {} bytes)",
            file_name,
            mime_type,
            data.len()
        );

        Ok(Self {
            file_name,
            mime_type,
            data,
        })
    }
}

/// Declared content type, or a guess from the file name when the client sent
/// none or only the generic binary type.
pub fn resolve_mime(content_type: Option<&str>, file_name: Option<&str>) -> String {
    match content_type {
        Some(declared) if !declared.trim().is_empty() && declared != "application/octet-stream" => {
            declared.to_string()
        }
        _ => file_name
            .and_then(|name| mime_guess::from_path(name).first_raw())
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub characters: usize,
    pub text: String,
}

/// Extract text from the multipart `file` field
pub async fn extract_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            upload = Some(Upload::from_field(field).await?);
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field".to_string()))?;
    let mime_type = upload.mime_type;

    let text = state.extractor().extract(upload.data, &mime_type).await?;

    Ok(Json(ExtractResponse {
        file_name: upload.file_name,
        mime_type,
        characters: text.chars().count(),
        text,
    }))
}

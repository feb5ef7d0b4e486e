//! Resume storage routes: multipart upload → extract → chunk/embed/store,
//! plus list and delete.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::models::resume::ResumeDocument;
use crate::routes::{embedding_key, request_config, LlmHeaders, TenantId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub chunk_count: usize,
}

/// Upload field content types are unreliable; fall back to the extension.
fn effective_mime(declared: &str, filename: &str) -> String {
    if declared != "application/octet-stream" && !declared.is_empty() {
        return declared.to_string();
    }
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf".to_string()
    } else if lower.ends_with(".txt") || lower.ends_with(".md") {
        "text/plain".to_string()
    } else {
        declared.to_string()
    }
}

/// POST /api/v1/resumes (multipart field `file`)
pub async fn handle_upload(
    State(state): State<AppState>,
    owner: TenantId,
    headers: LlmHeaders,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let config = request_config(&state, &owner.0, headers).await;
    let api_key = embedding_key(&config);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let declared = field.content_type().unwrap_or("").to_string();
        let bytes: bytes::Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;

        let mime = effective_mime(&declared, &filename);
        let text =
            extract_text(&bytes, &mime).map_err(|e| AppError::Validation(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "no text could be extracted from the file".to_string(),
            ));
        }

        let stored = state
            .vectors
            .store_resume(&owner.0, &filename, &text, api_key.as_deref())
            .await?;
        return Ok(Json(UploadResponse {
            resume_id: stored.resume_id,
            filename,
            chunk_count: stored.chunk_count,
        }));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    owner: TenantId,
) -> Result<Json<Vec<ResumeDocument>>, AppError> {
    Ok(Json(state.vectors.list_resumes(&owner.0).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    owner: TenantId,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.vectors.delete_resume(&owner.0, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("resume {id} not found")));
    }
    Ok(Json(serde_json::json!({ "deleted_chunks": deleted })))
}

//! Per-tenant settings: the stored gateway credential and preferred model.
//! The key is never echoed back in full.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm::credentials;
use crate::routes::TenantId;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    pub has_openrouter_key: bool,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    /// `None` leaves the key untouched; an empty string clears it.
    #[serde(default)]
    pub openrouter_key: Option<String>,
    #[serde(default)]
    pub llm_model: Option<String>,
}

/// GET /api/v1/user/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
    owner: TenantId,
) -> Result<Json<SettingsResponse>, AppError> {
    let stored = credentials::stored_credential(&state.db, &owner.0).await?;
    Ok(Json(match stored {
        Some(stored) => SettingsResponse {
            openrouter_key: Some(credentials::mask_key(&stored.api_key)),
            llm_model: stored.model,
            has_openrouter_key: true,
        },
        None => SettingsResponse {
            openrouter_key: None,
            llm_model: None,
            has_openrouter_key: false,
        },
    }))
}

/// PUT /api/v1/user/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    owner: TenantId,
    Json(update): Json<SettingsUpdate>,
) -> Result<StatusCode, AppError> {
    if let Some(key) = &update.openrouter_key {
        credentials::set_api_key(&state.db, &owner.0, key).await?;
    }
    if let Some(model) = &update.llm_model {
        credentials::set_model(&state.db, &owner.0, model).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/user/settings
pub async fn handle_delete_settings(
    State(state): State<AppState>,
    owner: TenantId,
) -> Result<StatusCode, AppError> {
    credentials::delete_all(&state.db, &owner.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
